use std::io::{BufRead, Write};

use log::{error, info, warn};

use crate::catalog::CityCatalog;
use crate::error::{BikeshareError, Result};
use crate::prompt::Prompter;
use crate::stats;
use crate::table::TripTable;
use crate::viewer::{RawDataViewer, RAW_PAGE_SIZE};

pub const CATALOG_MISMATCH: &str = "Cities do not match, exiting program";
pub const RESTART_QUESTION: &str = "\nWould you like to restart? Enter yes or no.\n";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operator declined to restart.
    Finished,
    /// The operator's input ran out mid-session.
    InputClosed,
    /// The city catalog failed its startup check; nothing was prompted.
    CatalogMismatch,
    /// A city's data could not be loaded.
    DataError,
}

/// The interactive outer loop: filters, reports, raw rows, restart.
pub struct Session<R, W> {
    catalog: CityCatalog,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(catalog: CityCatalog, input: R, output: W) -> Self {
        Self {
            catalog,
            prompter: Prompter::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Fatal conditions are reported to the operator and end the session
    /// normally; only output failures surface as errors.
    pub fn run(&mut self) -> Result<Outcome> {
        info!("using data directory {}", self.catalog.data_dir().display());
        if let Err(e) = self.catalog.verify() {
            warn!("{e}");
            self.prompter.say(CATALOG_MISMATCH)?;
            return Ok(Outcome::CatalogMismatch);
        }

        loop {
            let selection = match self.prompter.collect_filters() {
                Ok(selection) => selection,
                Err(BikeshareError::InputClosed) => return Ok(Outcome::InputClosed),
                Err(e) => return Err(e),
            };

            let table = match TripTable::load(&self.catalog, &selection) {
                Ok(table) => table,
                Err(e) => {
                    error!("failed to load {}: {e}", selection.city);
                    self.prompter.say(&format!(
                        "We are sorry there seems to be a problem with our data\n{e}\nexiting program"
                    ))?;
                    return Ok(Outcome::DataError);
                }
            };

            stats::print_all(&table, self.prompter.output())?;
            RawDataViewer::new(&table, RAW_PAGE_SIZE)?.run(&mut self.prompter)?;

            if !self.prompter.confirm(RESTART_QUESTION)? {
                info!("session finished");
                return Ok(Outcome::Finished);
            }
        }
    }
}
