//! Fixed filter vocabularies and the per-run filter selection.

use std::fmt;

/// A closed set of operator answers for one filter dimension.
pub trait Vocabulary: Copy + Sized + 'static {
    const ALL: &'static [Self];
    const QUESTION: &'static str;
    const INVALID: &'static str;

    /// Lower-case form the operator types.
    fn input_name(self) -> &'static str;

    fn parse(answer: &str) -> Option<Self> {
        let wanted = answer.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.input_name() == wanted)
    }
}

// ── City ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// File backing this city, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl Vocabulary for City {
    const ALL: &'static [Self] = &[City::Chicago, City::NewYorkCity, City::Washington];
    const QUESTION: &'static str =
        "Please enter one of the following cities - Chicago, New York City or Washington: ";
    const INVALID: &'static str = "This is not a valid city for analysis purposes.\n\
         The only available cities are Chicago, New York City or Washington.";

    fn input_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

// ── Month ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    /// Matches the `%B` rendering stored in the derived month column.
    pub fn title(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }
}

impl Vocabulary for Month {
    const ALL: &'static [Self] = &[
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];
    const QUESTION: &'static str =
        "Please enter a month between January and June - leave blank to search all months: ";
    const INVALID: &'static str = "This is not a valid month for analysis purposes.\n\
         The only valid months range from January to June inclusive.";

    fn input_name(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
        }
    }
}

// ── Day ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Matches the `%A` rendering stored in the derived weekday column.
    pub fn title(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl Vocabulary for Day {
    const ALL: &'static [Self] = &[
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];
    const QUESTION: &'static str =
        "Please enter a day of the week - leave blank to search all days: ";
    const INVALID: &'static str = "This is not a valid day for analysis purposes.\n\
         The only valid days range from Monday to Sunday inclusive.";

    fn input_name(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

// ── Selection ───────────────────────────────────────────────────────────────

/// The three filter answers for one run. `None` means "no filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSelection {
    pub city: City,
    pub month: Option<Month>,
    pub day: Option<Day>,
}

impl FilterSelection {
    pub fn new(city: City, month: Option<Month>, day: Option<Day>) -> Self {
        Self { city, month, day }
    }

    pub fn unfiltered(city: City) -> Self {
        Self::new(city, None, None)
    }
}
