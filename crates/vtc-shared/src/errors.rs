#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
    #[error("Required field missing: {0}")]
    MissingField(&'static str),
}
