use clap::Parser;
use form_roster::{Config, FailurePolicy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "form-roster")]
#[command(about = "Build participant and volunteer rosters from form-submission emails")]
#[command(version)]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "./ecmc-form-submissions",
        help = "Directory of raw notification emails"
    )]
    input: PathBuf,

    #[arg(short, long, default_value = "./out", help = "Directory for CSVs and email lists")]
    output: PathBuf,

    #[arg(
        short,
        long,
        default_value = "ecmc24",
        help = "Event tag appended to every output file name"
    )]
    event: String,

    #[arg(
        long,
        value_enum,
        default_value_t = FailurePolicy::Skip,
        help = "Messages without a usable HTML body"
    )]
    on_html_error: FailurePolicy,

    #[arg(
        long,
        value_enum,
        default_value_t = FailurePolicy::Abort,
        help = "Fields with malformed quoted-printable text"
    )]
    on_decode_error: FailurePolicy,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            input_dir: cli.input,
            output_dir: cli.output,
            event: cli.event,
            on_html_error: cli.on_html_error,
            on_decode_error: cli.on_decode_error,
        }
    }
}

/// `RUST_LOG` directives, falling back to `info` when none are given
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            &std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default(),
        ))
        .init();

    let config = Config::from(Cli::parse());

    match form_roster::run(&config) {
        Ok(summary) => {
            println!("Race numbers: {}", summary.race_numbers.join(", "));
            println!("Number of participants: {}", summary.participants);
            println!("Number of volunteers: {}", summary.volunteers);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
