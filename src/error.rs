// Error types shared by the fragment, transport and model layers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamSupportError {
    // Raised locally when a constructor gets neither an identifier nor a fragment
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    // The backing fragment has no child with the requested tag
    #[error("Attribute missing: {0}")]
    AttributeMissing(String),

    #[error("XML parse error: {0}")]
    XmlParse(String),

    #[error("XML serialization error: {0}")]
    XmlSerialize(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {status_code} - {message}")]
    ApiResponse { status_code: u16, message: String },

    #[error("No {kind} named {name:?}")]
    LookupNotFound { kind: &'static str, name: String },

    #[error("Ticket {ticket_id} has no description action")]
    MissingDescriptionAction { ticket_id: String },

    // Identifiers must not be empty or a relative path segment
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TeamSupportError {
    pub fn is_attribute_missing(&self) -> bool {
        matches!(self, TeamSupportError::AttributeMissing(_))
    }

    pub fn is_missing_argument(&self) -> bool {
        matches!(self, TeamSupportError::MissingArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, TeamSupportError>;
