//! Core types for registrants and rosters

use chrono::{DateTime, Utc};
use std::fmt;

/// Which registration form a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionKind {
    Participant,
    Volunteer,
}

impl SubmissionKind {
    /// Classify a message by its subject line: any `2` marks the volunteer form
    #[must_use]
    pub fn classify(subject: &str) -> Self {
        if subject.contains('2') {
            Self::Volunteer
        } else {
            Self::Participant
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participant => write!(f, "participant"),
            Self::Volunteer => write!(f, "volunteer"),
        }
    }
}

/// One person who submitted a registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    /// Form the record was built from
    pub kind: SubmissionKind,

    /// Message send time
    pub registered_at: DateTime<Utc>,

    pub name: String,

    /// First Reply-To address of the notification
    pub email: String,

    pub category: String,

    pub pronouns: String,

    /// Free-text message, quoted-printable decoded
    pub message: String,

    /// City or team
    pub affiliation: String,

    /// Empty for volunteers
    pub race_number: String,

    pub arrival: String,

    pub departure: String,
}

/// Registrants of one run, split by form
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub participants: Vec<Registrant>,
    pub volunteers: Vec<Registrant>,
}

impl Roster {
    /// Append a registrant to the collection its kind belongs to
    pub fn push(&mut self, registrant: Registrant) {
        match registrant.kind {
            SubmissionKind::Participant => self.participants.push(registrant),
            SubmissionKind::Volunteer => self.volunteers.push(registrant),
        }
    }

    /// Stable sort of participants by registration time, oldest first
    pub fn sort_participants(&mut self) {
        self.participants.sort_by_key(|p| p.registered_at);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty() && self.volunteers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len() + self.volunteers.len()
    }
}
