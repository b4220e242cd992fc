use std::path::Path;

use crate::{
    errors::Error,
    from_args::{parse_or_exit, try_parse},
    record::Record,
    settings::Settings,
};

/// Helper type for loading arguments from the environment.
///
/// This type exists to be an owned container for the arguments retrieved
/// from [`std::env`], which the positional tokens returned from parsing can
/// borrow from. Arguments that aren't valid UTF-8 are converted lossily.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<String>,
}

impl LoadedArguments {
    #[must_use]
    pub fn from_env() -> Self {
        std::env::args_os()
            .map(|argument| argument.to_string_lossy().into_owned())
            .collect()
    }

    /// The name of the program, without any leading directories. Empty if
    /// the platform didn't provide one.
    #[must_use]
    pub fn program(&self) -> &str {
        let argv0 = self.arguments.first().map_or("", String::as_str);

        Path::new(argv0)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(argv0)
    }

    /// Every argument after the program name
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }

    /// Settings for parsing into `R`: this program's name, and `R`'s
    /// description.
    #[must_use]
    pub fn settings_for<R: Record + ?Sized>(&self) -> Settings {
        Settings::for_record::<R>(self.program())
    }

    pub fn try_parse<R: Record + ?Sized>(&self, record: &mut R) -> Result<Vec<&str>, Error> {
        try_parse(self.tokens(), record, &self.settings_for::<R>())
    }

    /// Parse into `record`, exiting the process with a help message if
    /// that fails.
    pub fn parse<R: Record + ?Sized>(&self, record: &mut R) -> Vec<&str> {
        parse_or_exit(self.tokens(), record, &self.settings_for::<R>())
    }
}

impl FromIterator<String> for LoadedArguments {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            arguments: iter.into_iter().collect(),
        }
    }
}
