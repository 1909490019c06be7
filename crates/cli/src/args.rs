use anyhow::{Context as _, Result};
use fixcap_decimal::Precision;
use lexopt::ValueExt;

pub const PRECISION_VAR: &str = "FIXCAP_PRECISION";
pub const DEFAULT_DEPTH: u32 = 8;

pub const USAGE: &str = "\
Usage: fixcap [PRECISION] [--depth|-d DEPTH] [--json]

Estimates how many items a fixed point decimal representation can index.

Arguments:
  PRECISION          significant decimal digits [env: FIXCAP_PRECISION, default: 28]

Options:
  -d, --depth DEPTH  number of refinement levels [default: 8]
      --json         print the estimate as JSON
  -h, --help         print this message
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Estimate(Args),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Args {
    pub precision: Precision,
    pub depth: u32,
    pub json: bool,
}

fn parse_precision(digits: &str) -> Result<Precision> {
    let digits = digits
        .parse::<u32>()
        .with_context(|| format!("Invalid precision {digits:?}"))?;
    Precision::new(digits).context("Precision must be at least one digit")
}

/// Reads the default precision from [`PRECISION_VAR`], given its value if set.
fn default_precision(var: Option<String>) -> Result<Precision> {
    match var {
        Some(digits) => {
            parse_precision(&digits).with_context(|| format!("Invalid {PRECISION_VAR}"))
        }
        None => Ok(Precision::DEFAULT),
    }
}

pub fn parse(mut args: lexopt::Parser, precision_var: Option<String>) -> Result<Command> {
    use lexopt::Arg::*;

    let mut precision = None::<Precision>;
    let mut depth = DEFAULT_DEPTH;
    let mut json = false;

    while let Some(arg) = args.next()? {
        match arg {
            Short('h') | Long("help") => return Ok(Command::Help),
            Short('d') | Long("depth") => {
                depth = args.value()?.parse()?;
            }
            Long("json") => json = true,
            Value(value) if precision.is_none() => {
                let value = value.string()?;
                precision = Some(parse_precision(&value)?);
            }
            arg => return Err(arg.unexpected().into()),
        }
    }

    Ok(Command::Estimate(Args {
        precision: match precision {
            Some(precision) => precision,
            None => default_precision(precision_var)?,
        },
        depth,
        json,
    }))
}

#[cfg(test)]
mod tests {
    use fixcap_decimal::Precision;

    use super::{Args, Command, DEFAULT_DEPTH, parse};

    fn parse_args(args: &[&str], var: Option<&str>) -> anyhow::Result<Command> {
        parse(
            lexopt::Parser::from_args(args.iter().copied()),
            var.map(str::to_owned),
        )
    }

    #[test]
    fn test_parse() {
        #[track_caller]
        fn case(args: &[&str], var: Option<&str>, digits: u32, depth: u32, json: bool) {
            assert_eq!(
                parse_args(args, var).unwrap(),
                Command::Estimate(Args {
                    precision: Precision::new(digits).unwrap(),
                    depth,
                    json,
                }),
                "{args:?}"
            );
        }
        case(&[], None, 28, DEFAULT_DEPTH, false);
        case(&["15"], None, 15, DEFAULT_DEPTH, false);
        case(&["15", "-d", "3"], None, 15, 3, false);
        case(&["--depth=2", "--json", "40"], None, 40, 2, true);
        case(&[], Some("12"), 12, DEFAULT_DEPTH, false);
        case(&["20"], Some("12"), 20, DEFAULT_DEPTH, false);
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_args(&["--help"], None).unwrap(), Command::Help);
        assert_eq!(parse_args(&["10", "-h"], None).unwrap(), Command::Help);
    }

    #[test]
    fn test_invalid() {
        for args in [
            &["0"][..],
            &["ten"],
            &["-d"],
            &["-d", "x"],
            &["10", "11"],
            &["--verbose"],
        ] {
            assert!(parse_args(args, None).is_err(), "{args:?}");
        }
        assert!(parse_args(&[], Some("0")).is_err());
        assert!(parse_args(&[], Some("many")).is_err());
        // the variable is only consulted without a positional precision
        assert!(parse_args(&["10"], Some("many")).is_ok());
    }
}
