//! Positional form layouts and record mapping
//!
//! Both forms render their answers in a fixed order. Index 1 holds the
//! email-confirmation answer, which is never used: the address comes from the
//! message's Reply-To header instead.
//!
//! | Field        | Volunteer | Participant |
//! |--------------|-----------|-------------|
//! | name         | 0         | 0           |
//! | category     | 2         | 2           |
//! | pronouns     | 3         | 3           |
//! | message      | 4         | 4           |
//! | city/team    | 5         | 5           |
//! | race number  | -         | 6           |
//! | arrival      | 6         | 7           |
//! | departure    | 7         | 8           |

use crate::error::ShapeError;
use crate::types::{Registrant, SubmissionKind};
use chrono::{DateTime, Utc};

const VOLUNTEER_FIELDS: [&str; 6] = [
    "name",
    "email confirmation",
    "category",
    "pronouns",
    "message",
    "city/team",
];

const PARTICIPANT_FIELDS: [&str; 7] = [
    "name",
    "email confirmation",
    "category",
    "pronouns",
    "message",
    "city/team",
    "race number",
];

impl SubmissionKind {
    /// Names of the fields a submission of this kind must carry, in order
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Participant => &PARTICIPANT_FIELDS,
            Self::Volunteer => &VOLUNTEER_FIELDS,
        }
    }
}

/// Cleaned answers of one submission, checked against its layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFields<'a> {
    pub kind: SubmissionKind,
    pub name: &'a str,
    pub category: &'a str,
    pub pronouns: &'a str,
    pub message: &'a str,
    pub affiliation: &'a str,
    pub race_number: &'a str,
    pub arrival: &'a str,
    pub departure: &'a str,
}

impl<'a> FormFields<'a> {
    /// Validate `values` against the layout of `kind` and name each field.
    ///
    /// Arrival and departure are optional and default to `""`; every other
    /// field must be present.
    pub fn from_values<S: AsRef<str>>(
        kind: SubmissionKind,
        values: &'a [S],
    ) -> Result<Self, ShapeError> {
        let (common, race_number, travel) = match (kind, values) {
            (
                SubmissionKind::Volunteer,
                [name, _, category, pronouns, message, affiliation, travel @ ..],
            ) => (
                [name, category, pronouns, message, affiliation],
                "",
                travel,
            ),
            (
                SubmissionKind::Participant,
                [
                    name,
                    _,
                    category,
                    pronouns,
                    message,
                    affiliation,
                    race_number,
                    travel @ ..,
                ],
            ) => (
                [name, category, pronouns, message, affiliation],
                race_number.as_ref(),
                travel,
            ),
            _ => return Err(shape_error(kind, values.len())),
        };

        let [name, category, pronouns, message, affiliation] = common.map(S::as_ref);
        Ok(Self {
            kind,
            name,
            category,
            pronouns,
            message,
            affiliation,
            race_number,
            arrival: travel.first().map_or("", S::as_ref),
            departure: travel.get(1).map_or("", S::as_ref),
        })
    }

    /// Build a registrant, passing the name and message through `decode`.
    ///
    /// `decode` receives the field name and its raw value.
    pub fn to_registrant<F, E>(
        &self,
        email: &str,
        registered_at: DateTime<Utc>,
        mut decode: F,
    ) -> Result<Registrant, E>
    where
        F: FnMut(&'static str, &str) -> Result<String, E>,
    {
        Ok(Registrant {
            kind: self.kind,
            registered_at,
            name: decode("name", self.name)?,
            email: email.to_string(),
            category: self.category.to_string(),
            pronouns: self.pronouns.to_string(),
            message: decode("message", self.message)?,
            affiliation: self.affiliation.to_string(),
            race_number: self.race_number.to_string(),
            arrival: self.arrival.to_string(),
            departure: self.departure.to_string(),
        })
    }
}

fn shape_error(kind: SubmissionKind, found: usize) -> ShapeError {
    let fields = kind.required_fields();
    ShapeError {
        kind,
        field: fields.get(found).copied().unwrap_or("unknown"),
        index: found,
        expected: fields.len(),
        found,
    }
}
