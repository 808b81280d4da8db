//! Errors from reading run configurations and design descriptions.

/// Why an `acre.toml` or a design file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read input file: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML or JSON is malformed or has fields of the wrong type.
    #[error("malformed input: {0}")]
    ParseError(String),

    /// A section that has no default is absent, such as a design's outline.
    #[error("`{0}` is required")]
    MissingField(String),

    /// A value is outside its legal range.
    #[error("invalid value: {0}")]
    ValidationError(String),
}
