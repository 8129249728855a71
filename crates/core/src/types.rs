/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar day at UTC granularity. Update dates and attendance rows are
/// keyed by this, never by the exact posting timestamp.
pub type DayDate = chrono::NaiveDate;
