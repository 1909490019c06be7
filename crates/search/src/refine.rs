use slog::info;

use crate::scan::Grid;
use crate::{ConfigurationError, Outcome, ScanParams, Searcher};

impl Searcher {
    /// Scans, then repeatedly rescans the interval where collapse first appeared with a step ten
    /// times smaller, for at most `max_depth` scans in total.
    ///
    /// Each level starts and ends exactly on the previous level's range, so the upper end, already
    /// known to collapse, is always a candidate again. A scan that finds nothing ends the search
    /// immediately with its [`Outcome::NotFound`].
    pub fn refine(
        &self,
        params: &ScanParams,
        max_depth: u32,
    ) -> Result<Outcome, ConfigurationError> {
        let mut grid = Grid::new(params)?;
        let mut depth = max_depth;
        loop {
            let outcome = self.scan_grid(&grid)?;
            if !outcome.is_found() {
                return Ok(outcome);
            }

            depth = depth.saturating_sub(1);
            if depth < 1 {
                info!(self.log, "Reached depth {depth}");
                return Ok(outcome);
            }
            info!(self.log, "Current depth is {depth}");

            grid = grid.refined(outcome.range());
        }
    }
}
