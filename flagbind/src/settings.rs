use crate::record::Record;

/**
Runtime settings for one parse: the program name shown in usage messages,
an optional description, and whether the first positional token stops flag
processing (it does by default).
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    program: String,
    description: Option<String>,
    stop_on_positional: bool,
}

impl Settings {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            description: None,
            stop_on_positional: true,
        }
    }

    /// Settings for a record type, using its [`DESCRIPTION`][Record::DESCRIPTION]
    /// (usually its doc comment) as the help description.
    #[must_use]
    pub fn for_record<R: Record + ?Sized>(program: impl Into<String>) -> Self {
        let settings = Self::new(program);

        match R::DESCRIPTION.trim() {
            "" => settings,
            description => settings.with_description(description),
        }
    }

    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_stop_on_positional(self, stop_on_positional: bool) -> Self {
        Self {
            stop_on_positional,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn stop_on_positional(&self) -> bool {
        self.stop_on_positional
    }
}
