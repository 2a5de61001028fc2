//! CSV rosters, mailing lists and the run summary

use crate::config::Config;
use crate::error::{Result, RosterError};
use crate::types::{Registrant, Roster};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::info;

pub const PARTICIPANT_HEADER: [&str; 10] = [
    "name",
    "email",
    "category",
    "pronouns",
    "racenumber",
    "city/team",
    "arrival",
    "departure",
    "registered_at",
    "message",
];

pub const VOLUNTEER_HEADER: [&str; 9] = [
    "name",
    "email",
    "category",
    "pronouns",
    "city/team",
    "arrival",
    "departure",
    "registered_at",
    "message",
];

/// What a finished export reports back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub participants: usize,
    pub volunteers: usize,

    /// Participant race numbers, numerically ascending
    pub race_numbers: Vec<String>,
}

/// Deduplicated registrant addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailLists<'a> {
    pub volunteers: Vec<&'a str>,
    pub participants: Vec<&'a str>,

    /// Volunteers first, then participants not already listed
    pub all: Vec<&'a str>,
}

impl<'a> EmailLists<'a> {
    #[must_use]
    pub fn from_roster(roster: &'a Roster) -> Self {
        let volunteers = dedup(roster.volunteers.iter().map(|v| v.email.as_str()));
        let participants = dedup(roster.participants.iter().map(|p| p.email.as_str()));
        let all = dedup(volunteers.iter().chain(&participants).copied());

        Self {
            volunteers,
            participants,
            all,
        }
    }
}

/// Drop repeated values, keeping the first occurrence of each
pub fn dedup<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}

/// Race numbers in numeric order. Values that are not numbers sort as 0.
#[must_use]
pub fn race_numbers(participants: &[Registrant]) -> Vec<String> {
    let mut numbers: Vec<String> = participants
        .iter()
        .map(|p| p.race_number.clone())
        .collect();
    numbers.sort_by_key(|n| n.trim().parse::<i64>().unwrap_or(0));
    numbers
}

/// `2024-03-04 17:00:00 +0000 UTC`
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S %z %Z").to_string()
}

/// One line of the participants CSV, in header order
#[derive(Debug, Serialize)]
struct ParticipantRow<'a> {
    name: &'a str,
    email: &'a str,
    category: &'a str,
    pronouns: &'a str,
    #[serde(rename = "racenumber")]
    race_number: &'a str,
    #[serde(rename = "city/team")]
    affiliation: &'a str,
    arrival: &'a str,
    departure: &'a str,
    registered_at: String,
    message: &'a str,
}

impl<'a> From<&'a Registrant> for ParticipantRow<'a> {
    fn from(p: &'a Registrant) -> Self {
        Self {
            name: &p.name,
            email: &p.email,
            category: &p.category,
            pronouns: &p.pronouns,
            race_number: &p.race_number,
            affiliation: &p.affiliation,
            arrival: &p.arrival,
            departure: &p.departure,
            registered_at: format_timestamp(p.registered_at),
            message: &p.message,
        }
    }
}

/// One line of the volunteers CSV, in header order
#[derive(Debug, Serialize)]
struct VolunteerRow<'a> {
    name: &'a str,
    email: &'a str,
    category: &'a str,
    pronouns: &'a str,
    #[serde(rename = "city/team")]
    affiliation: &'a str,
    arrival: &'a str,
    departure: &'a str,
    registered_at: String,
    message: &'a str,
}

impl<'a> From<&'a Registrant> for VolunteerRow<'a> {
    fn from(v: &'a Registrant) -> Self {
        Self {
            name: &v.name,
            email: &v.email,
            category: &v.category,
            pronouns: &v.pronouns,
            affiliation: &v.affiliation,
            arrival: &v.arrival,
            departure: &v.departure,
            registered_at: format_timestamp(v.registered_at),
            message: &v.message,
        }
    }
}

pub fn write_participants<W: io::Write>(
    writer: W,
    participants: &[Registrant],
) -> csv::Result<()> {
    write_rows(writer, PARTICIPANT_HEADER, participants.iter().map(ParticipantRow::from))
}

pub fn write_volunteers<W: io::Write>(
    writer: W,
    volunteers: &[Registrant],
) -> csv::Result<()> {
    write_rows(writer, VOLUNTEER_HEADER, volunteers.iter().map(VolunteerRow::from))
}

/// The header goes out explicitly so an empty roster still gets one
fn write_rows<W, H, I>(writer: W, header: H, rows: I) -> csv::Result<()>
where
    W: io::Write,
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(header)?;

    for row in rows {
        csv.serialize(row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Create the output directory if it does not exist yet
pub fn prepare_output_dir(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.output_dir).map_err(|source| RosterError::Output {
        path: config.output_dir.clone(),
        source,
    })?;
    info!("Output directory {} ready", config.output_dir.display());
    Ok(())
}

/// Write both CSVs and the three email lists, replacing earlier output.
///
/// Participants are expected to be sorted already; see
/// [`Roster::sort_participants`].
pub fn write_exports(roster: &Roster, config: &Config) -> Result<ExportSummary> {
    let path = config.participants_csv();
    info!("Generating participant CSV {}", path.display());
    write_csv(&path, |file| write_participants(file, &roster.participants))?;

    let path = config.volunteers_csv();
    info!("Generating volunteer CSV {}", path.display());
    write_csv(&path, |file| write_volunteers(file, &roster.volunteers))?;

    info!("Generating email lists");
    let lists = EmailLists::from_roster(roster);
    write_list(&config.volunteer_emails(), &lists.volunteers)?;
    write_list(&config.participant_emails(), &lists.participants)?;
    write_list(&config.all_emails(), &lists.all)?;

    Ok(ExportSummary {
        participants: roster.participants.len(),
        volunteers: roster.volunteers.len(),
        race_numbers: race_numbers(&roster.participants),
    })
}

fn write_csv<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(File) -> csv::Result<()>,
{
    let file = File::create(path).map_err(|source| RosterError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    write(file).map_err(|source| RosterError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn write_list(path: &Path, emails: &[&str]) -> Result<()> {
    fs::write(path, emails.join(",")).map_err(|source| RosterError::Output {
        path: path.to_path_buf(),
        source,
    })
}
