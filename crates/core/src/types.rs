/// Content store document ids are opaque strings (e.g. `"JOB-001"`).
pub type DocId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
