/// Rows at the top of the table that hold labels rather than records.
pub const DEFAULT_HEADER_ROWS: usize = 1;

/// Page size requested from the calendar directory. Only one page is read.
pub const CALENDAR_PAGE_SIZE: u32 = 100;

/// How far ahead `upcoming` looks when no end date is given.
pub const DEFAULT_UPCOMING_DAYS: i64 = 365;

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_TIMEZONE: &str = "UTC";
