//! Error types for roster extraction

use crate::types::SubmissionKind;
use std::path::PathBuf;
use thiserror::Error;

/// A message carried no HTML the label walk could use
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HtmlError {
    /// No `text/html` part anywhere in the MIME tree
    #[error("no text/html part")]
    MissingPart,

    /// The HTML part decoded to nothing but whitespace
    #[error("text/html part is empty")]
    Empty,
}

/// Failed to reverse the quoted-printable encoding of a field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid quoted-printable text: {0}")]
pub struct DecodeError(pub String);

/// The cleaned values do not fill the layout's required fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{kind} layout needs {expected} fields but found {found}; missing {field} at index {index}"
)]
pub struct ShapeError {
    pub kind: SubmissionKind,
    pub field: &'static str,
    pub index: usize,
    pub expected: usize,
    pub found: usize,
}

/// A message envelope could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Failed to parse the MIME structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Header absent or unparseable
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),
}

/// Errors that stop (or, per policy, skip) part of a roster run
#[derive(Error, Debug)]
pub enum RosterError {
    /// Input directory missing or unreadable
    #[error("Failed to read input directory {}: {source}", .path.display())]
    InputDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to parse the message envelope
    #[error("Failed to parse message {}: {source}", .path.display())]
    Message {
        path: PathBuf,
        #[source]
        source: MessageError,
    },

    /// No usable HTML body
    #[error("No usable HTML body in {}: {source}", .path.display())]
    Html {
        path: PathBuf,
        #[source]
        source: HtmlError,
    },

    /// Extracted fields do not match the form layout
    #[error("Message {} does not match the form layout: {source}", .path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ShapeError,
    },

    /// Failed to decode a free-text field
    #[error("Failed to decode {field} in {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        field: &'static str,
        #[source]
        source: DecodeError,
    },

    /// Output directory or file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed
    #[error("Failed to write CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
