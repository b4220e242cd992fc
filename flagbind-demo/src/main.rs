mod error;

use std::{
    io::{self, Write as _},
    time::Duration,
};

use anyhow::Context as _;
use flagbind::{Convertible, LoadedArguments, Record};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::error::TimeoutError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Convertible)]
enum Level {
    Quiet,
    #[default]
    Normal,
    Chatty,
}

/// A duration written as a number and a unit, like `250ms` or `5m`. A bare
/// number is in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timeout(Duration);

impl Default for Timeout {
    fn default() -> Self {
        Self(Duration::from_secs(30))
    }
}

impl Convertible for Timeout {
    type Err = TimeoutError;

    fn parse_from_string(text: &str) -> Result<Self, Self::Err> {
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());

        let (number, unit) = text.split_at(split);

        if number.is_empty() {
            return Err(TimeoutError::MissingNumber);
        }

        let number: u64 = number
            .parse()
            .map_err(|_| TimeoutError::BadNumber(number.to_owned()))?;

        let duration = match unit {
            "ms" => Some(Duration::from_millis(number)),
            "" | "s" => Some(Duration::from_secs(number)),
            "m" => number.checked_mul(60).map(Duration::from_secs),
            "h" => number.checked_mul(60 * 60).map(Duration::from_secs),
            unit => return Err(TimeoutError::BadUnit(unit.to_owned())),
        };

        duration
            .map(Self)
            .ok_or_else(|| TimeoutError::TooLarge(text.to_owned()))
    }
}

/// Fetch some URLs, in a pretend sort of way.
///
/// Everything after the first URL is passed through untouched.
#[derive(Debug, Default, Record)]
struct Options {
    /// Print what would be fetched, without fetching it
    #[flagbind(alias = "n")]
    dry_run: bool,

    /// How much to say while working
    #[flagbind(alias = "l")]
    level: Level,

    /// How many times to try each URL
    retries: u32,

    /// Give up on a URL after this long
    #[flagbind(alias = "t", placeholder = "DURATION")]
    timeout: Timeout,

    /// Extra headers to send, as NAME:VALUE; may be repeated
    header: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let arguments = LoadedArguments::from_env();
    let mut options = Options {
        retries: 3,
        ..Options::default()
    };

    let urls = arguments.parse(&mut options);
    tracing::debug!(?options, "parsed options");

    let mut out = io::stdout().lock();

    if options.level != Level::Quiet {
        writeln!(
            out,
            "{} {} url(s), {} retries, {:?} timeout",
            if options.dry_run { "would fetch" } else { "fetching" },
            urls.len(),
            options.retries,
            options.timeout.0,
        )
        .context("failed to write to stdout")?;
    }

    for url in urls {
        writeln!(out, "{url}").context("failed to write to stdout")?;

        if options.level == Level::Chatty {
            for header in &options.header {
                writeln!(out, "  {header}").context("failed to write to stdout")?;
            }
        }
    }

    Ok(())
}
