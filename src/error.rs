use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebounceError {
    /// Construction-time rejection: the supplied configuration cannot
    /// describe a debouncer (malformed TOML, wrong field types).
    /// Out-of-range but well-typed values are normalized instead.
    #[error("invalid debounce argument: {0}")]
    InvalidArgument(String),
}
