//! Run configuration

use clap::ValueEnum;
use std::path::PathBuf;

/// What to do when one message fails a recoverable stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Stop the run with the error
    Abort,
    /// Log a warning and carry on without the message (or field)
    Skip,
}

/// Paths, event tag and failure policies for one roster run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of raw notification messages
    pub input_dir: PathBuf,

    /// Directory the CSVs and email lists are written to
    pub output_dir: PathBuf,

    /// Suffix of every output file name, e.g. `ecmc24`
    pub event: String,

    /// Messages without a usable HTML body
    pub on_html_error: FailurePolicy,

    /// Name or message fields the quoted-printable decoder rejects.
    /// `Skip` leaves the field empty.
    pub on_decode_error: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./ecmc-form-submissions"),
            output_dir: PathBuf::from("./out"),
            event: "ecmc24".to_string(),
            on_html_error: FailurePolicy::Skip,
            on_decode_error: FailurePolicy::Abort,
        }
    }
}

impl Config {
    #[must_use]
    pub fn participants_csv(&self) -> PathBuf {
        self.output_file("participants", "csv")
    }

    #[must_use]
    pub fn volunteers_csv(&self) -> PathBuf {
        self.output_file("volunteers", "csv")
    }

    #[must_use]
    pub fn volunteer_emails(&self) -> PathBuf {
        self.output_file("volunteer-emails", "txt")
    }

    #[must_use]
    pub fn participant_emails(&self) -> PathBuf {
        self.output_file("participant-emails", "txt")
    }

    #[must_use]
    pub fn all_emails(&self) -> PathBuf {
        self.output_file("all-emails", "txt")
    }

    fn output_file(&self, stem: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}-{}.{extension}", self.event))
    }
}
