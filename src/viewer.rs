//! Forward-only pagination of the filtered trips.
//!
//! Pages show the source columns in filter order; the derived columns and the
//! positional row index stay hidden.

use std::io::{BufRead, Write};

use log::debug;
use polars::prelude::*;

use crate::error::Result;
use crate::prompt::Prompter;
use crate::schema::derived;
use crate::table::{format_cell, TripTable, ROW_INDEX};

pub const RAW_PAGE_SIZE: usize = 10;
pub const ALL_VIEWED: &str = "All raw data has now been viewed";

/// One slice of visible rows.
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: DataFrame,
    /// Set on the short page that ends pagination.
    pub last: bool,
}

pub struct RawDataViewer {
    visible: DataFrame,
    page_size: usize,
    offset: usize,
    exhausted: bool,
}

impl RawDataViewer {
    pub fn new(table: &TripTable, page_size: usize) -> Result<Self> {
        let frame = table.frame();
        let shown: Vec<&str> = frame
            .get_column_names_str()
            .into_iter()
            .filter(|name| *name != ROW_INDEX && !derived::ALL.contains(name))
            .collect();

        Ok(Self {
            visible: frame.select(shown)?,
            page_size,
            offset: 0,
            exhausted: false,
        })
    }

    pub fn first_question(&self) -> String {
        format!(
            "Would you like to view {} lines of raw data? (The results will be ordered as per your initial input - Enter yes or no) ",
            self.page_size
        )
    }

    pub fn next_question(&self) -> String {
        format!(
            "Would you like to view the next {} lines of raw data? (Enter yes or no) ",
            self.page_size
        )
    }

    /// The next page, or `None` once a short page has been handed out.
    pub fn next_page(&mut self) -> Option<Page> {
        if self.exhausted {
            return None;
        }
        let rows = self.visible.slice(self.offset as i64, self.page_size);
        self.offset += self.page_size;
        self.exhausted = rows.height() < self.page_size;
        debug!(
            "raw page of {} rows, next offset {}",
            rows.height(),
            self.offset
        );
        Some(Page {
            rows,
            last: self.exhausted,
        })
    }

    /// Ask before every page and stop on anything but "yes".
    pub fn run<R: BufRead, W: Write>(&mut self, prompter: &mut Prompter<R, W>) -> Result<()> {
        loop {
            let question = if self.offset == 0 {
                self.first_question()
            } else {
                self.next_question()
            };
            if !prompter.confirm(&format!("\n{question}"))? {
                return Ok(());
            }

            let Some(page) = self.next_page() else {
                return Ok(());
            };
            if page.rows.height() > 0 {
                prompter.say(&format!("\n{}", render(&page.rows)?))?;
            }
            if page.last {
                prompter.say(&format!("\n{ALL_VIEWED}"))?;
                return Ok(());
            }
        }
    }
}

/// Aligned plain-text table with a header row.
pub fn render(frame: &DataFrame) -> Result<String> {
    let names = frame.get_column_names_str();
    let columns = frame.get_columns();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(frame.height());
    for i in 0..frame.height() {
        let row = columns
            .iter()
            .map(|c| c.get(i).map(|v| format_cell(&v)))
            .collect::<PolarsResult<Vec<_>>>()?;
        cells.push(row);
    }

    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            cells
                .iter()
                .map(|row| row[j].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    write_row(&mut out, names.iter().map(|n| n.to_string()), &widths);
    for row in cells {
        write_row(&mut out, row.into_iter(), &widths);
    }
    Ok(out.trim_end().to_string())
}

fn write_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    for (cell, width) in cells.zip(widths) {
        out.push_str(&format!("{cell:>width$}  "));
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
}
