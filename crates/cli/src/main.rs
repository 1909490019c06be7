#![deny(unused_must_use)]

mod args;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use fixcap_search::{Estimate, estimate_capacity};
use slog::{debug, error};

use args::{Args, Command};

fn summary(estimate: &Estimate) -> String {
    format!(
        "2^{} items ({} fixed point decimals, searched to a depth {})",
        estimate.bits, estimate.precision, estimate.depth
    )
}

fn main() -> Result<ExitCode> {
    let _guard = slog_envlogger::init()?;
    let log = slog_scope::logger();

    let command = args::parse(
        lexopt::Parser::from_env(),
        std::env::var(args::PRECISION_VAR).ok(),
    )?;
    let Args {
        precision,
        depth,
        json,
    } = match command {
        Command::Help => {
            print!("{}", args::USAGE);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Estimate(args) => args,
    };

    debug!(log, "Estimating capacity at {precision} digits to a depth of {depth}");
    let Some(estimate) = estimate_capacity(precision, depth, &log)? else {
        error!(
            log,
            "Search exhausted without finding where {precision} digits stop distinguishing terms"
        );
        return Ok(ExitCode::FAILURE);
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer(&mut stdout, &estimate)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", summary(&estimate))?;
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use fixcap_decimal::Precision;
    use fixcap_search::{Estimate, Exponent, Range};

    use super::summary;

    fn estimate() -> Estimate {
        Estimate {
            precision: Precision::new(10).unwrap(),
            depth: 3,
            boundary: Range {
                low: Exponent::new(234, 2),
                high: Exponent::new(235, 2),
            },
            bits: 11.5,
        }
    }

    #[test]
    fn test_summary() {
        assert_eq!(
            summary(&estimate()),
            "2^11.5 items (10 fixed point decimals, searched to a depth 3)"
        );
    }

    #[test]
    fn test_json() {
        assert_eq!(
            serde_json::to_value(estimate()).unwrap(),
            serde_json::json!({
                "precision": 10,
                "depth": 3,
                "boundary": { "low": 2.34, "high": 2.35 },
                "bits": 11.5,
            })
        );
    }
}
