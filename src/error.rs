use thiserror::Error;

/// Failures raised while deriving addresses, rendering templates or editing
/// an inventory document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    #[error("field \"{field}\" is not a valid IPv4 address: {value:?}")]
    InvalidAddress { field: String, value: String },

    #[error("field \"{field}\" must not carry a network mask \"/\"; derived addresses are computed automatically")]
    UnexpectedMask { field: String },

    #[error("field \"{field}\" must carry a network mask (\"/prefix\")")]
    MissingMask { field: String },

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("template \"{0}\" not found")]
    TemplateNotFound(String),

    #[error("line to insert is empty")]
    EmptyLine,

    #[error("unknown command kind: {0}")]
    UnknownCommand(String),
}

impl GenError {
    pub fn invalid_address(field: &str, value: &str) -> Self {
        Self::InvalidAddress {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
