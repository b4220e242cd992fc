#![no_std]

/*!
Low-level implementation of token handling. Takes care of distinguishing
flag-shaped tokens from positionals, splitting `--name=value`, and the
stop-on-positional boundary. No name resolution or type handling happens
here. Usually this is too low level to use directly.
*/

#[cfg(test)]
extern crate std;

/// The character that marks a token as flag-shaped. Any run of it is
/// stripped, so `-v`, `--verbose` and `---verbose` are all flags.
pub const FLAG_MARKER: char = '-';

/**
The [`ArgumentsParser`] type operates by passing tokens it finds into a
[`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A bare token that isn't flag-shaped, or any token at all once the
    /// parser has stopped scanning for flags.
    fn visit_positional(self, argument: &'arg str) -> Self::Value;

    /// A flag that definitely has an inline value, because it was given as
    /// `--flag=value`. The value may be empty (`--flag=`); the visitor decides
    /// what that means. `flag` has its markers stripped but is otherwise
    /// untouched.
    fn visit_flag_with_value(self, flag: &'arg str, value: &'arg str) -> Self::Value;

    /// A flag without an inline value, such as `--flag` or `-abc`. `flag` has
    /// its markers stripped but is otherwise untouched.
    fn visit_flag(self, flag: &'arg str, argument: impl ArgAccess<'arg>) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given flag needs a value, based
on the identity of the flag.

Consider `--name Jack`. Is this a boolean flag followed by the positional
`Jack`, or an option that takes `Jack` as its value? The [`ArgumentsParser`]
can't classify it on its own, so a visitor requests the value through this
trait only for flags that need one.
*/
pub trait ArgAccess<'arg>: Sized {
    /**
    Get the next token from the parser, verbatim. It is returned even if it
    looks like a flag, so `--temperature -10` works. Flags that don't take a
    value should simply ignore this, so that the next token is parsed on its
    own.

    Returns [`None`] if the tokens are exhausted.
    */
    fn take(self) -> Option<&'arg str>;
}

/// Whether the parser is still looking for flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Scanning,
    Stopped,
}

/**
An `ArgumentsParser` is the main entry point into `flagbind_parser`. It
handles one token (and possibly its value) in each call to `next_arg`,
sending it to the given [`Visitor`].

When `stop_on_positional` is set, the first bare token moves the parser into
[`State::Stopped`], after which every remaining token is reported as
positional without being inspected. Stopping is permanent.

The parser operates entirely on borrowed data; the `'arg` lifetime refers to
the borrowed command line.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<'arg, I> {
    state: State,
    stop_on_positional: bool,
    args: I,
    phantom: core::marker::PhantomData<&'arg str>,
}

impl<'arg, I> ArgumentsParser<'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of tokens. This list
    should *exclude* the name of the program.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>, stop_on_positional: bool) -> Self {
        Self {
            state: State::Scanning,
            stop_on_positional,
            args: args.into_iter(),
            phantom: core::marker::PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        let argument = self.args.next()?;

        Some(match self.state {
            State::Stopped => visitor.visit_positional(argument),
            State::Scanning => match strip_markers(argument) {
                None => {
                    if self.stop_on_positional {
                        self.state = State::Stopped;
                    }
                    visitor.visit_positional(argument)
                }
                Some(flag) => match split_once(flag, b'=') {
                    Some((flag, value)) => visitor.visit_flag_with_value(flag, value),
                    None => visitor.visit_flag(flag, StandardArgAccess { parent: self }),
                },
            },
        })
    }
}

/// ArgAccess implementation that gets the next token from the list.
struct StandardArgAccess<'a, 'arg, I> {
    parent: &'a mut ArgumentsParser<'arg, I>,
}

impl<'arg, I> ArgAccess<'arg> for StandardArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    #[inline]
    fn take(self) -> Option<&'arg str> {
        self.parent.args.next()
    }
}

/// If `token` is flag-shaped, return it without its leading run of markers.
/// The result may be empty, for `-` or `--`.
#[inline]
#[must_use]
pub fn strip_markers(token: &str) -> Option<&str> {
    match token.starts_with(FLAG_MARKER) {
        true => Some(token.trim_start_matches(FLAG_MARKER)),
        false => None,
    }
}

fn split_once(input: &str, delimiter: u8) -> Option<(&str, &str)> {
    // The delimiter is ASCII, so both sides of it are char boundaries
    memchr::memchr(delimiter, input.as_bytes()).map(|i| (&input[..i], &input[i + 1..]))
}
