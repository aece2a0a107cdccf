/// National-dex numbers are small positive integers (stored as INT).
pub type DexId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
