use std::process;

use crate::{
    binder::bind,
    errors::Error,
    help::Help,
    record::Record,
    registry::Registry,
    settings::Settings,
};

/// Exit status for a usage error
pub const USAGE_EXIT_CODE: i32 = 2;

/**
Bind `tokens` (which should *exclude* the program name) into `record`,
returning the positional tokens that were left over.

A request for help is reported as [`Error::HelpRequested`]. On any error,
fields bound before the failing token keep their new values.
*/
pub fn try_parse<'arg, R, S>(
    tokens: &'arg [S],
    record: &mut R,
    settings: &Settings,
) -> Result<Vec<&'arg str>, Error>
where
    R: Record + ?Sized,
    S: AsRef<str>,
{
    let mut registry = Registry::build(record)?;
    bind(
        &mut registry,
        tokens.iter().map(AsRef::as_ref),
        settings.stop_on_positional(),
    )
}

/**
Like [`try_parse`], but handles failure by exiting the process. A help
request prints the help message to stderr and exits successfully; any other
error prints the help message followed by the error, and exits with
[`USAGE_EXIT_CODE`].
*/
pub fn parse_or_exit<'arg, R, S>(
    tokens: &'arg [S],
    record: &mut R,
    settings: &Settings,
) -> Vec<&'arg str>
where
    R: Record + ?Sized,
    S: AsRef<str>,
{
    let mut registry = match Registry::build(record) {
        Ok(registry) => registry,
        Err(error) => {
            eprintln!("error: {error}");
            process::exit(USAGE_EXIT_CODE);
        }
    };

    let error = match bind(
        &mut registry,
        tokens.iter().map(AsRef::as_ref),
        settings.stop_on_positional(),
    ) {
        Ok(positionals) => return positionals,
        Err(error) => error,
    };

    let help = Help {
        settings,
        registry: &registry,
    };

    if error.is_help_request() {
        eprint!("{help}");
        process::exit(0);
    }

    tracing::debug!(%error, "failed to parse arguments");
    eprint!("{help}");
    eprintln!("error: {error}");
    process::exit(USAGE_EXIT_CODE);
}
