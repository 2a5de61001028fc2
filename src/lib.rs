// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Form Roster
//!
//! Turns a directory of race-registration form notifications into
//! participant and volunteer rosters.
//!
//! Each message's HTML body is walked for `<b>label:</b> <span>value</span>`
//! pairs up to the form footer, the values are mapped onto one of two fixed
//! layouts (the subject decides which), and the results are exported as CSV
//! plus deduplicated, comma-joined mailing lists.
//!
//! # Example
//!
//! ```rust
//! use form_roster::{FormFields, SubmissionKind, extract_labels, clean_field};
//!
//! let html = "<p><b>Name:</b> <span>Jane Doe</span></p>\
//!             <p><b>Email:</b> <span>jane@example.com</span></p>\
//!             <p><b>Category:</b> <span>Runner</span></p>\
//!             <p><b>Pronouns:</b> <span>she/her</span></p>\
//!             <p><b>Message:</b> <span>Hi there</span></p>\
//!             <p><b>City/Team:</b> <span>Metro TC</span></p>\
//!             <p>Sent via form submission from Example</p>";
//!
//! let lines = extract_labels(html).unwrap();
//! let values: Vec<&str> = lines.iter().map(|l| clean_field(l)).collect();
//! let fields = FormFields::from_values(SubmissionKind::classify("Form 2"), &values).unwrap();
//!
//! assert_eq!(fields.name, "Jane Doe");
//! assert_eq!(fields.affiliation, "Metro TC");
//! ```

mod config;
mod decode;
mod error;
mod export;
mod extract;
mod layout;
mod message;
mod roster;
mod types;

pub use config::{Config, FailurePolicy};
pub use decode::decode_field;
pub use error::{DecodeError, HtmlError, MessageError, Result, RosterError, ShapeError};
pub use export::{
    EmailLists, ExportSummary, PARTICIPANT_HEADER, VOLUNTEER_HEADER, dedup, format_timestamp,
    prepare_output_dir, race_numbers, write_exports, write_participants, write_volunteers,
};
pub use extract::{SENTINEL, clean_field, extract_labels, label_pairs};
pub use layout::FormFields;
pub use message::{FormMessage, parse_message};
pub use roster::{build_roster, process_message};
pub use types::*;

/// Build the roster from `config.input_dir` and write every export.
pub fn run(config: &Config) -> Result<ExportSummary> {
    prepare_output_dir(config)?;

    let mut roster = build_roster(config)?;
    roster.sort_participants();

    write_exports(&roster, config)
}
