use chrono::NaiveDateTime;

/// Text form timestamps are bound as; reads back through `RowValues::as_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%F %T%.f";

#[must_use]
pub fn timestamp_to_sqlite_text(dt: &NaiveDateTime) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}
