/// Column-name constants for the trip tables.
/// Single source of truth for the loader, the reports and the raw viewer.

// ── Source columns ──────────────────────────────────────────────────────────
pub mod trip {
    pub const START_TIME: &str = "Start Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    /// Present in every city's file.
    pub const REQUIRED: [&str; 5] = [
        START_TIME,
        TRIP_DURATION,
        START_STATION,
        END_STATION,
        USER_TYPE,
    ];

    pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

// ── Derived columns ─────────────────────────────────────────────────────────
pub mod derived {
    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const START_HOUR: &str = "start_hour";

    /// Hidden from the raw viewer.
    pub const ALL: [&str; 3] = [MONTH, DAY_OF_WEEK, START_HOUR];
}

// ── Aggregation output ──────────────────────────────────────────────────────
pub mod agg {
    pub const COUNT: &str = "count";
}
