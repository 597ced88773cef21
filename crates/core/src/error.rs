#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid site configuration: {0}")]
    Config(String),
}
