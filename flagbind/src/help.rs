/*!
Usage and help messages, rendered from a [`Registry`]'s ordered slots.

```text
Usage: greet [-h] [-v] [-n NAME] [--grades GRADES]... ARGS...

Greet someone.

Options:
  -h, --help=false       Show this help
  -v, --verbose=false    Print more
  -n, --name=""          Who to greet
      --grades=[]
```
 */

use core::{
    fmt::{self, Display},
    iter,
};

use indent_write::fmt::IndentWriter;
use joinery::JoinableIterator;
use lazy_format::lazy_format;
use textwrap::WrapAlgorithm;

use crate::{
    record::Kind,
    registry::{Registry, Slot},
    settings::Settings,
    util::dashed,
};

const TEXT_WIDTH: usize = 80;
const MIN_WRAP_WIDTH: usize = 24;
const INDENT: &str = "  ";

/// Space between the widest option tags and the descriptions
const GAP: usize = 4;

fn usage_item<'a>(slot: &'a Slot<'_>) -> impl Display + 'a {
    let name = dashed(slot.usage_name());
    let placeholder = slot.placeholder();

    lazy_format!(match (slot.kind()) {
        Kind::Bool => "[{name}]",
        Kind::Sequence => "[{name} {placeholder}]...",
        _ => "[{name} {placeholder}]",
    })
}

/// The one-line usage message: the reserved `-h`, then every slot in
/// declaration order, then `ARGS...`.
pub fn usage<'a>(program: &'a str, registry: &'a Registry<'_>) -> impl Display + 'a {
    let items = lazy_format!(" {item}" for item in registry.slots().iter().map(usage_item));
    lazy_format!("Usage: {program} [-h]{items} ARGS...")
}

fn option_tags<'a>(slot: &'a Slot<'_>) -> impl Display + 'a {
    let pad = match (slot.alias(), slot.primary_name().chars().nth(1)) {
        (None, Some(_)) => "    ",
        _ => "",
    };

    let names = slot
        .alias()
        .into_iter()
        .chain(iter::once(slot.primary_name()))
        .map(dashed)
        .join_with(", ");

    let placeholder = slot.placeholder();

    lazy_format!(match ((slot.default_text(), slot.kind())) {
        (Some(default), _) => "{pad}{names}={default}",
        (None, Kind::Sequence) => "{pad}{names} <{placeholder}>...",
        (None, _) => "{pad}{names} <{placeholder}>",
    })
}

/// Describe an item by printing its tags, followed by the description
/// wrapped into a column starting at `column`.
fn describe(
    out: &mut impl fmt::Write,
    tags: &str,
    description: &str,
    column: usize,
    width: usize,
) -> fmt::Result {
    if description.trim().is_empty() {
        return writeln!(out, "{tags}");
    }

    let options = textwrap::Options::new(width).wrap_algorithm(WrapAlgorithm::FirstFit);
    let mut lines = textwrap::wrap(description, options).into_iter();

    if let Some(first) = lines.next() {
        writeln!(out, "{tags:column$}{first}")?;
    }

    lines.try_for_each(|line| writeln!(out, "{:column$}{line}", ""))
}

/// Write the `Options:` section: the reserved help flag and one entry per
/// slot, with aligned descriptions. Nothing is written for an empty
/// registry.
pub fn write_details(out: &mut impl fmt::Write, registry: &Registry<'_>) -> fmt::Result {
    if registry.is_empty() {
        return Ok(());
    }

    let rows: Vec<(String, &str)> = iter::once((String::from("-h, --help=false"), "Show this help"))
        .chain(registry.slots().iter().map(|slot| {
            (option_tags(slot).to_string(), slot.help().unwrap_or(""))
        }))
        .collect();

    let column = rows
        .iter()
        .map(|(tags, _)| tags.chars().count())
        .max()
        .unwrap_or(0)
        + GAP;

    let width = TEXT_WIDTH
        .saturating_sub(INDENT.len() + column)
        .max(MIN_WRAP_WIDTH);

    writeln!(out, "Options:")?;
    let mut out = IndentWriter::new(INDENT, out);

    rows.iter()
        .try_for_each(|(tags, description)| describe(&mut out, tags, description, column, width))
}

pub fn write_help(
    out: &mut impl fmt::Write,
    settings: &Settings,
    registry: &Registry<'_>,
) -> fmt::Result {
    writeln!(out, "{}", usage(settings.program(), registry))?;
    writeln!(out)?;

    if let Some(description) = settings.description() {
        let options = textwrap::Options::new(TEXT_WIDTH).wrap_algorithm(WrapAlgorithm::FirstFit);
        writeln!(out, "{}", textwrap::fill(description, options))?;
        writeln!(out)?;
    }

    write_details(out, registry)
}

/// The full help message as a [`Display`] value: the usage line, the
/// description, and the option details.
#[derive(Debug, Clone, Copy)]
pub struct Help<'a, 'r> {
    pub settings: &'a Settings,
    pub registry: &'a Registry<'r>,
}

impl Display for Help<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_help(f, self.settings, self.registry)
    }
}
