/*!
The token binder: drives an [`ArgumentsParser`] over a [`Registry`],
resolving each flag to its slot, coercing values into the record, and
collecting positional tokens.
 */

use flagbind_parser::{ArgAccess, ArgumentsParser, State, Visitor};

use crate::{
    errors::Error,
    registry::{Registry, Storage},
};

/// Flag names that always request the help message, ahead of any slot
pub const HELP_TRIGGERS: [&str; 2] = ["h", "help"];

/// Where a flag's value comes from, if it needs one
enum FlagValue<'arg, A> {
    Inline(&'arg str),
    Next(A),
}

struct Binder<'a, 'r, 'arg> {
    registry: &'a mut Registry<'r>,
    positionals: Vec<&'arg str>,
}

impl<'arg> Binder<'_, '_, 'arg> {
    fn bind_flag<A: ArgAccess<'arg>>(
        &mut self,
        flag: &'arg str,
        value: FlagValue<'arg, A>,
    ) -> Result<(), Error> {
        let name = flag.to_lowercase();

        if HELP_TRIGGERS.contains(&name.as_str()) {
            tracing::trace!(flag, "help requested");
            return Err(Error::HelpRequested);
        }

        let slot = match self.registry.lookup_mut(&name) {
            Some(slot) => slot,
            None => return self.bind_cluster(name, value),
        };

        match (slot.storage_mut(), value) {
            (Storage::Flag(_), FlagValue::Inline(value)) => Err(Error::UnexpectedValue {
                flag: name,
                value: value.to_owned(),
            }),
            (Storage::Flag(target), FlagValue::Next(_)) => {
                tracing::trace!(flag = name.as_str(), "set flag");
                **target = true;
                Ok(())
            }
            (Storage::Value(storage), value) => {
                let text = match value {
                    FlagValue::Inline(text) => text,
                    FlagValue::Next(access) => access
                        .take()
                        .ok_or_else(|| Error::MissingValue { flag: name.clone() })?,
                };

                tracing::trace!(flag = name.as_str(), value = text, "bind value");
                storage.store(text).map_err(|err| err.with_flag(&name, text))
            }
        }
    }

    /// `-vd` is `-v -d`, but only if every character names a boolean slot.
    /// Characters before a failing one stay applied.
    fn bind_cluster<A>(&mut self, name: String, value: FlagValue<'arg, A>) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::UnrecognizedFlag { flag: name });
        }

        for c in name.chars() {
            let mut buffer = [0; 4];
            let short = c.encode_utf8(&mut buffer);

            match self.registry.lookup_mut(short).map(|slot| slot.storage_mut()) {
                Some(Storage::Flag(target)) => {
                    tracing::trace!(flag = &*short, cluster = name.as_str(), "set clustered flag");
                    **target = true;
                }
                _ => return Err(Error::UnrecognizedFlag { flag: name }),
            }
        }

        match value {
            FlagValue::Inline(value) => Err(Error::UnexpectedValue {
                flag: name,
                value: value.to_owned(),
            }),
            FlagValue::Next(_) => Ok(()),
        }
    }
}

impl<'arg> Visitor<'arg> for &mut Binder<'_, '_, 'arg> {
    type Value = Result<(), Error>;

    fn visit_positional(self, argument: &'arg str) -> Self::Value {
        tracing::trace!(argument, "positional");
        self.positionals.push(argument);
        Ok(())
    }

    fn visit_flag_with_value(self, flag: &'arg str, value: &'arg str) -> Self::Value {
        match value.is_empty() {
            true => Err(Error::MissingValue {
                flag: flag.to_lowercase(),
            }),
            false => self.bind_flag::<NoAccess>(flag, FlagValue::Inline(value)),
        }
    }

    fn visit_flag(self, flag: &'arg str, argument: impl ArgAccess<'arg>) -> Self::Value {
        self.bind_flag(flag, FlagValue::Next(argument))
    }
}

/// Stand-in access for flags whose value was given inline
struct NoAccess;

impl<'arg> ArgAccess<'arg> for NoAccess {
    fn take(self) -> Option<&'arg str> {
        None
    }
}

/**
Bind every token into the registry, returning the positional tokens in
order. With `stop_on_positional`, the first positional token ends flag
processing and everything after it is returned verbatim.

Binding stops at the first error. Slots set before the error keep their
values.
*/
pub fn bind<'arg>(
    registry: &mut Registry<'_>,
    tokens: impl IntoIterator<Item = &'arg str>,
    stop_on_positional: bool,
) -> Result<Vec<&'arg str>, Error> {
    let mut parser = ArgumentsParser::new(tokens, stop_on_positional);
    let mut binder = Binder {
        registry,
        positionals: Vec::new(),
    };

    while let Some(result) = parser.next_arg(&mut binder) {
        result?;

        if parser.state() == State::Stopped
            && let [first] = binder.positionals.as_slice()
        {
            tracing::debug!(at = *first, "stopped scanning for flags");
        }
    }

    Ok(binder.positionals)
}
