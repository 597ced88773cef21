/// Errors raised by content store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned into a document.
    #[error("Malformed document {id}: {reason}")]
    Decode { id: String, reason: String },

    #[error("Cannot load seed data: {0}")]
    Seed(String),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}
