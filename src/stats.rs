//! The four descriptive reports printed for every run.
//!
//! Every most-common / arg-max pick takes the highest count and, among equal
//! counts, the smallest key in ascending order. Nulls never count.

use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use log::debug;
use polars::prelude::*;

use crate::error::Result;
use crate::schema::{agg, derived, trip};
use crate::table::{format_cell, TripTable};

pub const SEPARATOR_WIDTH: usize = 40;
pub const NO_DATA: &str = "No trips match the selected filters";

/// A report computed from the filtered table and rendered via `Display`.
pub trait Report: fmt::Display + Sized {
    const HEADER: &'static str;

    fn compute(table: &TripTable) -> Result<Self>;
}

/// Compute `R`, then print its header, body, timing and separator.
pub fn print_report<R: Report, W: Write>(table: &TripTable, out: &mut W) -> Result<R> {
    writeln!(out, "\n{}\n", R::HEADER)?;
    let (report, elapsed) = timed(|| R::compute(table))?;
    debug!("{} computed in {:?}", R::HEADER, elapsed);
    write!(out, "{report}")?;
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{}", separator())?;
    Ok(report)
}

/// All four reports, in display order.
pub fn print_all<W: Write>(table: &TripTable, out: &mut W) -> Result<()> {
    print_report::<TimeReport, _>(table, out)?;
    print_report::<StationReport, _>(table, out)?;
    print_report::<DurationReport, _>(table, out)?;
    print_report::<UserReport, _>(table, out)?;
    Ok(())
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

fn timed<T>(f: impl FnOnce() -> Result<T>) -> Result<(T, Duration)> {
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed()))
}

// ── Counting helpers ────────────────────────────────────────────────────────

/// Group by `keys`, count rows, and order by count desc then keys asc.
fn ranked_counts(df: &DataFrame, keys: &[&str]) -> Result<DataFrame> {
    let mut lazy = df.clone().lazy();
    for key in keys {
        lazy = lazy.filter(col(*key).is_not_null());
    }

    let group_keys: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let mut order = vec![col(agg::COUNT)];
    order.extend(group_keys.iter().cloned());
    let mut descending = vec![true];
    descending.extend(keys.iter().map(|_| false));

    let ranked = lazy
        .group_by(group_keys)
        .agg([len().alias(agg::COUNT)])
        .sort_by_exprs(
            order,
            SortMultipleOptions::default().with_order_descending_multi(descending),
        )
        .collect()?;
    Ok(ranked)
}

/// Most common value of `column`, rendered as text.
fn mode(df: &DataFrame, column: &str) -> Result<Option<String>> {
    let ranked = ranked_counts(df, &[column])?;
    first_cell(&ranked, column)
}

fn first_cell(df: &DataFrame, column: &str) -> Result<Option<String>> {
    if df.height() == 0 {
        return Ok(None);
    }
    Ok(Some(format_cell(&df.column(column)?.get(0)?)))
}

/// Every non-null value of `column` with its count, most frequent first.
fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, u64)>> {
    let ranked = ranked_counts(df, &[column])?;
    let keys = ranked.column(column)?;
    let counts = ranked.column(agg::COUNT)?;

    let mut rows = Vec::with_capacity(ranked.height());
    for i in 0..ranked.height() {
        let key = format_cell(&keys.get(i)?);
        let count = counts.get(i)?.try_extract::<u64>()?;
        rows.push((key, count));
    }
    Ok(rows)
}

fn or_no_data<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NO_DATA.to_string(),
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[(String, u64)]) -> fmt::Result {
    if counts.is_empty() {
        return writeln!(f, "{NO_DATA}");
    }
    let width = counts.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    for (key, count) in counts {
        writeln!(f, "{key:<width$}    {count}")?;
    }
    Ok(())
}

// ── Time of travel ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeReport {
    pub month: Option<String>,
    pub day_of_week: Option<String>,
    pub start_hour: Option<u32>,
}

impl Report for TimeReport {
    const HEADER: &'static str = "Calculating The Most Frequent Times of Travel...";

    fn compute(table: &TripTable) -> Result<Self> {
        let df = table.frame();

        // Hour is derived here, not stored on the table.
        let hours = df
            .clone()
            .lazy()
            .select([col(trip::START_TIME).dt().hour().alias(derived::START_HOUR)])
            .collect()?;
        let ranked = ranked_counts(&hours, &[derived::START_HOUR])?;
        let start_hour = if ranked.height() == 0 {
            None
        } else {
            Some(
                ranked
                    .column(derived::START_HOUR)?
                    .get(0)?
                    .try_extract::<u32>()?,
            )
        };

        Ok(Self {
            month: mode(df, derived::MONTH)?,
            day_of_week: mode(df, derived::DAY_OF_WEEK)?,
            start_hour,
        })
    }
}

impl fmt::Display for TimeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The most common month is {}", or_no_data(&self.month))?;
        writeln!(
            f,
            "The most common day of the week is {}",
            or_no_data(&self.day_of_week)
        )?;
        match self.start_hour {
            Some(h) => writeln!(f, "The most common start hour is {h} (24 hour clock)"),
            None => writeln!(f, "The most common start hour is {NO_DATA}"),
        }
    }
}

// ── Stations ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationReport {
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub trip: Option<(String, String)>,
}

impl Report for StationReport {
    const HEADER: &'static str = "Calculating The Most Popular Stations and Trip...";

    fn compute(table: &TripTable) -> Result<Self> {
        let df = table.frame();
        let pairs = ranked_counts(df, &[trip::START_STATION, trip::END_STATION])?;
        let pair = match (
            first_cell(&pairs, trip::START_STATION)?,
            first_cell(&pairs, trip::END_STATION)?,
        ) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        };

        Ok(Self {
            start_station: mode(df, trip::START_STATION)?,
            end_station: mode(df, trip::END_STATION)?,
            trip: pair,
        })
    }
}

impl fmt::Display for StationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start_station {
            Some(s) => writeln!(f, "The most commonly used start station is '{s}'")?,
            None => writeln!(f, "The most commonly used start station is {NO_DATA}")?,
        }
        match &self.end_station {
            Some(s) => writeln!(f, "The most commonly used end station is '{s}'")?,
            None => writeln!(f, "The most commonly used end station is {NO_DATA}")?,
        }
        match &self.trip {
            Some((from, to)) => writeln!(
                f,
                "The most frequent combination of start station and end station trip is '{from}' and '{to}'"
            ),
            None => writeln!(
                f,
                "The most frequent combination of start station and end station trip is {NO_DATA}"
            ),
        }
    }
}

// ── Trip duration ───────────────────────────────────────────────────────────

/// Total and mean duration in seconds, truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationReport {
    pub total: Option<i64>,
    pub mean: Option<i64>,
}

impl Report for DurationReport {
    const HEADER: &'static str = "Calculating Trip Duration...";

    fn compute(table: &TripTable) -> Result<Self> {
        let durations = table
            .frame()
            .column(trip::TRIP_DURATION)?
            .as_materialized_series();
        if durations.len() == durations.null_count() {
            return Ok(Self {
                total: None,
                mean: None,
            });
        }

        let total = durations.sum_reduce()?.value().try_extract::<f64>().ok();
        let mean = durations.mean_reduce().value().try_extract::<f64>().ok();

        Ok(Self {
            total: total.map(|t| t.trunc() as i64),
            mean: mean.filter(|m| m.is_finite()).map(|m| m.trunc() as i64),
        })
    }
}

impl fmt::Display for DurationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The total travel time is {}", or_no_data(&self.total))?;
        writeln!(f, "The mean travel time is {}", or_no_data(&self.mean))
    }
}

// ── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYears {
    pub earliest: i64,
    pub most_recent: i64,
    pub most_common: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReport {
    pub user_types: Vec<(String, u64)>,
    /// `None` when the city does not record gender.
    pub genders: Option<Vec<(String, u64)>>,
    /// Outer `None` when the city does not record birth year; inner `None`
    /// when it does but no filtered row carries one.
    pub birth_years: Option<Option<BirthYears>>,
}

impl Report for UserReport {
    const HEADER: &'static str = "Calculating User Stats...";

    fn compute(table: &TripTable) -> Result<Self> {
        let df = table.frame();

        let genders = if table.has_gender() {
            Some(value_counts(df, trip::GENDER)?)
        } else {
            None
        };

        let birth_years = if table.has_birth_year() {
            Some(birth_year_stats(df)?)
        } else {
            None
        };

        Ok(Self {
            user_types: value_counts(df, trip::USER_TYPE)?,
            genders,
            birth_years,
        })
    }
}

fn birth_year_stats(df: &DataFrame) -> Result<Option<BirthYears>> {
    let years = df.column(trip::BIRTH_YEAR)?.as_materialized_series();
    if years.len() == years.null_count() {
        return Ok(None);
    }

    let earliest = years.min_reduce()?.value().try_extract::<f64>()?;
    let most_recent = years.max_reduce()?.value().try_extract::<f64>()?;

    let ranked = ranked_counts(df, &[trip::BIRTH_YEAR])?;
    let most_common = ranked
        .column(trip::BIRTH_YEAR)?
        .get(0)?
        .try_extract::<f64>()?;

    Ok(Some(BirthYears {
        earliest: earliest as i64,
        most_recent: most_recent as i64,
        most_common: most_common as i64,
    }))
}

impl fmt::Display for UserReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The counts for user types are - ")?;
        write_counts(f, &self.user_types)?;
        writeln!(f)?;

        match &self.genders {
            Some(genders) => {
                writeln!(f, "The counts of genders are - ")?;
                write_counts(f, genders)?;
                writeln!(f)?;
            }
            None => writeln!(f, "Gender data unavailable for this city\n")?,
        }

        match &self.birth_years {
            Some(Some(years)) => {
                writeln!(f, "The earliest birth year is {}", years.earliest)?;
                writeln!(f, "The most recent birth year is {}", years.most_recent)?;
                writeln!(f, "The most common birth year is {}", years.most_common)
            }
            Some(None) => writeln!(f, "Birth year: {NO_DATA}"),
            None => writeln!(f, "Year of birth data unavailable for this city"),
        }
    }
}
