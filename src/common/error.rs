use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Can't read trace file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed trace document: {0}")]
    Malformed(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Detected an extra XML element <{element}> inside <{parent}>")]
    UnexpectedElement { element: String, parent: String },

    #[error("Invalid value {value:?} for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Unexpected content after the root element: {0:?}")]
    TrailingContent(String),

    #[error("Trace document has no root element")]
    Empty,

    #[error("Trace document ended inside <{0}>")]
    Truncated(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Can't register node at {endpoint}: {reason}")]
    Registration { endpoint: String, reason: String },

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Configuration rendering error: {0}")]
    Rendering(#[from] toml::ser::Error),
}

pub type TraceResult<T> = Result<T, TraceError>;
pub type TransportResult<T> = Result<T, TransportError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
