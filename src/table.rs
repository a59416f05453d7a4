use std::path::Path;

use chrono::DateTime;
use log::{debug, info};
use polars::datatypes::{AnyValue, TimeUnit};
use polars::prelude::StrptimeOptions;
use polars::prelude::*;

use crate::catalog::CityCatalog;
use crate::error::{BikeshareError, Result};
use crate::schema::{derived, trip};
use crate::selection::{Day, FilterSelection, Month};

/// Name given to the unnamed leading column of the stock CSV files.
pub const ROW_INDEX: &str = "row_index";

/// One city's trips after parsing, derivation and filtering.
///
/// Wraps a polars `DataFrame` holding the source columns (start time parsed
/// to a datetime, numeric columns cast to `Float64`) followed by the derived
/// `month` and `day_of_week` columns.
#[derive(Debug, Clone)]
pub struct TripTable {
    df: DataFrame,
}

impl TripTable {
    /// Load the selected city's file and apply the month / day filters.
    pub fn load(catalog: &CityCatalog, selection: &FilterSelection) -> Result<Self> {
        let path = catalog.path_for(selection.city)?;
        info!("loading {} trips from {}", selection.city, path.display());

        let raw = read_csv_as_strings(&path)?;
        debug!("read {} raw rows", raw.height());

        let table = Self::from_raw(raw, selection.month, selection.day)?;
        info!(
            "{} trips after filtering (month: {:?}, day: {:?})",
            table.height(),
            selection.month,
            selection.day
        );
        Ok(table)
    }

    /// Build a table from an all-string frame as read from CSV.
    pub fn from_raw(raw: DataFrame, month: Option<Month>, day: Option<Day>) -> Result<Self> {
        require_columns(&raw, &trip::REQUIRED)?;
        let has_birth_year = raw.column(trip::BIRTH_YEAR).is_ok();

        let mut lazy = raw.lazy().with_columns([
            parse_datetime(trip::START_TIME, trip::START_TIME_FORMAT),
            parse_float(trip::TRIP_DURATION),
        ]);
        if has_birth_year {
            lazy = lazy.with_columns([parse_float(trip::BIRTH_YEAR)]);
        }

        // Derived columns are computed from the parsed timestamp, so rows
        // without one cannot take part in filtering.
        lazy = lazy
            .filter(col(trip::START_TIME).is_not_null())
            .with_columns([
                col(trip::START_TIME)
                    .dt()
                    .strftime("%B")
                    .alias(derived::MONTH),
                col(trip::START_TIME)
                    .dt()
                    .strftime("%A")
                    .alias(derived::DAY_OF_WEEK),
            ]);

        if let Some(month) = month {
            lazy = lazy.filter(col(derived::MONTH).eq(lit(month.title())));
        }
        if let Some(day) = day {
            lazy = lazy.filter(col(derived::DAY_OF_WEEK).eq(lit(day.title())));
        }

        Ok(Self {
            df: lazy.collect()?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Not every city records rider gender.
    pub fn has_gender(&self) -> bool {
        self.has_column(trip::GENDER)
    }

    /// Not every city records rider birth year.
    pub fn has_birth_year(&self) -> bool {
        self.has_column(trip::BIRTH_YEAR)
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names and names a blank leading column.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let mut names: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    if let Some(first) = names.first_mut() {
        if is_positional_index(first) {
            *first = ROW_INDEX.to_string();
        }
    }
    df.set_column_names(names.as_slice())?;

    Ok(df)
}

/// Blank header cells come back either empty or auto-named by the reader.
fn is_positional_index(name: &str) -> bool {
    name.is_empty() || name == "column_1" || name.starts_with("Unnamed")
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(BikeshareError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

fn parse_datetime(column: &str, format: &str) -> Expr {
    col(column)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .str()
        .to_datetime(
            Some(TimeUnit::Microseconds),
            None,
            StrptimeOptions {
                format: Some(format.into()),
                strict: true,
                ..Default::default()
            },
            lit("raise"),
        )
}

/// Blank cells become null; anything else must be a number.
fn parse_float(column: &str) -> Expr {
    let trimmed = col(column).str().strip_chars(lit(" \t\r\n"));
    when(trimmed.clone().eq(lit("")))
        .then(lit(NULL))
        .otherwise(trimmed)
        .strict_cast(DataType::Float64)
}

/// Render a single cell for terminal output.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "NaN".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        // Whole-second durations are stored as floats but read as integers.
        AnyValue::Float64(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        AnyValue::Datetime(v, unit, _) => {
            let micros = match unit {
                TimeUnit::Nanoseconds => v / 1_000,
                TimeUnit::Microseconds => *v,
                TimeUnit::Milliseconds => v * 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map(|dt| dt.naive_utc().format(trip::START_TIME_FORMAT).to_string())
                .unwrap_or_else(|| v.to_string())
        }
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_trips() -> DataFrame {
        df!(
            trip::START_TIME => [
                "2017-01-02 08:15:00", // Monday, January
                "2017-01-03 09:00:00", // Tuesday, January
                "2017-02-06 17:45:10", // Monday, February
                "2017-02-07 18:00:00", // Tuesday, February
                "2017-02-13 07:30:00", // Monday, February
            ],
            trip::TRIP_DURATION => ["100", "200", "300", "400", "500"],
            trip::START_STATION => ["A", "B", "A", "C", "A"],
            trip::END_STATION => ["B", "C", "B", "A", "C"],
            trip::USER_TYPE => ["Subscriber", "Customer", "Subscriber", "Subscriber", "Customer"]
        )
        .unwrap()
    }

    fn strings(table: &TripTable, column: &str) -> Vec<String> {
        let c = table.frame().column(column).unwrap();
        (0..c.len()).map(|i| format_cell(&c.get(i).unwrap())).collect()
    }

    #[test]
    fn derives_month_and_weekday_names() {
        let table = TripTable::from_raw(raw_trips(), None, None).unwrap();
        assert_eq!(table.height(), 5);
        assert_eq!(
            strings(&table, derived::MONTH),
            ["January", "January", "February", "February", "February"]
        );
        assert_eq!(
            strings(&table, derived::DAY_OF_WEEK),
            ["Monday", "Tuesday", "Monday", "Tuesday", "Monday"]
        );
    }

    #[test]
    fn month_filter_keeps_only_that_month() {
        let table = TripTable::from_raw(raw_trips(), Some(Month::January), None).unwrap();
        assert_eq!(table.height(), 2);
        assert!(strings(&table, derived::MONTH).iter().all(|m| m == "January"));
    }

    #[test]
    fn month_and_day_filters_are_conjunctive() {
        let table =
            TripTable::from_raw(raw_trips(), Some(Month::February), Some(Day::Monday)).unwrap();
        assert_eq!(
            strings(&table, trip::START_TIME),
            ["2017-02-06 17:45:10", "2017-02-13 07:30:00"]
        );
    }

    #[test]
    fn filter_with_no_matches_yields_empty_table() {
        let table = TripTable::from_raw(raw_trips(), Some(Month::June), None).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn optional_columns_are_detected_from_schema() {
        let table = TripTable::from_raw(raw_trips(), None, None).unwrap();
        assert!(!table.has_gender());
        assert!(!table.has_birth_year());
    }

    #[test]
    fn missing_required_column_is_reported() {
        let raw = raw_trips().drop(trip::USER_TYPE).unwrap();
        let err = TripTable::from_raw(raw, None, None).unwrap_err();
        assert!(matches!(err, BikeshareError::MissingColumn(c) if c == trip::USER_TYPE));
    }

    #[test]
    fn malformed_start_time_is_a_parse_error() {
        let mut raw = raw_trips();
        raw.with_column(Column::new(
            trip::START_TIME.into(),
            ["not a time", "x", "y", "z", "w"],
        ))
        .unwrap();
        assert!(TripTable::from_raw(raw, None, None).is_err());
    }

    #[test]
    fn malformed_numbers_are_parse_errors() {
        let mut raw = raw_trips();
        raw.with_column(Column::new(
            trip::TRIP_DURATION.into(),
            ["abc", "10", "20", "30", "40"],
        ))
        .unwrap();
        assert!(TripTable::from_raw(raw, None, None).is_err());

        let mut raw = raw_trips();
        raw.with_column(Column::new(
            trip::BIRTH_YEAR.into(),
            ["19x2", "1990", "1985", "1970", "2001"],
        ))
        .unwrap();
        assert!(TripTable::from_raw(raw, None, None).is_err());
    }

    #[test]
    fn blank_numbers_become_null() {
        let mut raw = raw_trips();
        raw.with_column(Column::new(
            trip::BIRTH_YEAR.into(),
            [Some("1990.0"), Some("  "), None, Some("1985"), Some("")],
        ))
        .unwrap();
        let table = TripTable::from_raw(raw, None, None).unwrap();
        let years = table.frame().column(trip::BIRTH_YEAR).unwrap();
        assert_eq!(years.null_count(), 3);
        assert_eq!(
            strings(&table, trip::BIRTH_YEAR),
            ["1990", "NaN", "NaN", "1985", "NaN"]
        );
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(format_cell(&AnyValue::Float64(321.0)), "321");
        assert_eq!(format_cell(&AnyValue::Float64(489.066)), "489.066");
        assert_eq!(format_cell(&AnyValue::Null), "NaN");
    }

    #[test]
    fn positional_index_names() {
        assert!(is_positional_index(""));
        assert!(is_positional_index("Unnamed: 0"));
        assert!(!is_positional_index("Start Time"));
    }
}
