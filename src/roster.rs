//! Roster building over a directory of notification messages

use crate::config::{Config, FailurePolicy};
use crate::decode::decode_field;
use crate::error::{Result, RosterError};
use crate::extract::{clean_field, extract_labels};
use crate::layout::FormFields;
use crate::message::parse_message;
use crate::types::{Registrant, Roster};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Read every message in `config.input_dir` and sort the registrants into a roster.
///
/// Files are visited in name order. Anything that is not a regular file is
/// ignored, and a file that cannot be read is skipped with a warning.
pub fn build_roster(config: &Config) -> Result<Roster> {
    let mut roster = Roster::default();

    let entries = WalkDir::new(&config.input_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|source| RosterError::InputDir {
            path: config.input_dir.clone(),
            source,
        })?;

        if !entry.file_type().is_file() {
            debug!("Skipping non-regular entry {}", entry.path().display());
            continue;
        }

        let path = entry.path();
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", path.display(), e);
                continue;
            }
        };

        if let Some(registrant) = process_message(path, &raw, config)? {
            roster.push(registrant);
        }
    }

    if roster.is_empty() {
        warn!("No registrations found in {}", config.input_dir.display());
    }

    info!(
        "Read {} participant(s) and {} volunteer(s) from {}",
        roster.participants.len(),
        roster.volunteers.len(),
        config.input_dir.display()
    );

    Ok(roster)
}

/// Run one message through parse, classify, extract, clean and map.
///
/// Returns `Ok(None)` when the message was skipped under the configured
/// HTML failure policy.
pub fn process_message(
    path: &Path,
    raw: &[u8],
    config: &Config,
) -> Result<Option<Registrant>> {
    let message = parse_message(raw).map_err(|source| RosterError::Message {
        path: path.to_path_buf(),
        source,
    })?;
    let kind = message.kind();

    let lines = match message.html_body().and_then(extract_labels) {
        Ok(lines) => lines,
        Err(source) => {
            let err = RosterError::Html {
                path: path.to_path_buf(),
                source,
            };
            return match config.on_html_error {
                FailurePolicy::Abort => Err(err),
                FailurePolicy::Skip => {
                    warn!("{err}; skipping message");
                    Ok(None)
                }
            };
        }
    };

    let values: Vec<&str> = lines.iter().map(String::as_str).map(clean_field).collect();
    debug!(
        "{}: {} submission with {} field(s)",
        path.display(),
        kind,
        values.len()
    );

    let fields = FormFields::from_values(kind, &values).map_err(|source| RosterError::Shape {
        path: path.to_path_buf(),
        source,
    })?;

    let registrant = fields.to_registrant(&message.reply_to, message.sent_at, |field, value| {
        decode_with_policy(path, field, value, config.on_decode_error)
    })?;

    Ok(Some(registrant))
}

fn decode_with_policy(
    path: &Path,
    field: &'static str,
    value: &str,
    policy: FailurePolicy,
) -> Result<String> {
    match decode_field(value) {
        Ok(decoded) => Ok(decoded),
        Err(source) => {
            let err = RosterError::Decode {
                path: path.to_path_buf(),
                field,
                source,
            };
            match policy {
                FailurePolicy::Abort => Err(err),
                FailurePolicy::Skip => {
                    warn!("{err}; leaving field empty");
                    Ok(String::new())
                }
            }
        }
    }
}
