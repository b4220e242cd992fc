/*!
The slot registry: the name → slot mapping built from a [`Record`]'s
description, along with the ordered listing used for help messages.
 */

use std::collections::{HashMap, hash_map::Entry};

use crate::{
    errors::{Error, ValueError},
    record::{Accumulate, Assign, Binding, FieldDescriptor, Fields, Kind, Record},
};

/**
Turn a field identifier into a flag name. A `-` is inserted before each
uppercase character that is neither the first nor the last character, and
then everything is lowercased; `_` is also treated as a word separator. So
`DummyArg` and `dummy_arg` are both `dummy-arg`, but `DummyA` is `dummya`.
*/
#[must_use]
pub fn decompose_name(identifier: &str) -> String {
    let last = identifier.chars().count().saturating_sub(1);
    let mut name = String::with_capacity(identifier.len() + 4);

    for (index, c) in identifier.chars().enumerate() {
        let separator = match c {
            '_' => true,
            c if c.is_uppercase() => index > 0 && index != last,
            _ => false,
        };

        if separator && !name.is_empty() && !name.ends_with('-') {
            name.push('-');
        }

        if c != '_' {
            name.extend(c.to_lowercase());
        }
    }

    name
}

fn default_placeholder(primary_name: &str) -> String {
    primary_name.to_uppercase().replace('-', "_")
}

/// Where a slot's value actually goes. Validated at registration, so a
/// sequence always has a scalar element kind.
pub(crate) enum Storage<'r> {
    Flag(&'r mut bool),
    Value(ValueStorage<'r>),
}

pub(crate) enum ValueStorage<'r> {
    Single(&'r mut dyn Assign),
    Sequence(&'r mut dyn Accumulate),
}

impl ValueStorage<'_> {
    /// Coerce `text` into this slot, replacing a single value or appending
    /// to a sequence.
    pub(crate) fn store(&mut self, text: &str) -> Result<(), ValueError> {
        match *self {
            ValueStorage::Single(ref mut target) => target.assign(text),
            ValueStorage::Sequence(ref mut target) => target.accumulate(text),
        }
    }
}

/// One bindable field of a record.
pub struct Slot<'r> {
    identifier: &'r str,
    primary_name: String,
    alias: Option<String>,
    help: Option<&'r str>,
    placeholder: String,
    default: Option<String>,
    kind: Kind,
    element: Option<Kind>,
    storage: Storage<'r>,
}

impl<'r> Slot<'r> {
    fn from_descriptor(descriptor: FieldDescriptor<'r>) -> Result<Self, Error> {
        let FieldDescriptor {
            identifier,
            binding,
            alias,
            help,
            placeholder,
        } = descriptor;

        let unsupported = |type_name: &str| Error::UnsupportedType {
            field: identifier.to_owned(),
            type_name: type_name.to_owned(),
        };

        let unsupported_element = |element: &str| Error::UnsupportedElementType {
            field: identifier.to_owned(),
            element: element.to_owned(),
        };

        let (kind, element, default, storage) = match binding {
            Binding::Flag(target) => (
                Kind::Bool,
                None,
                Some(target.to_string()),
                Storage::Flag(target),
            ),
            Binding::Value { kind, target } if kind.is_scalar() => (
                kind,
                None,
                target.render_current(),
                Storage::Value(ValueStorage::Single(target)),
            ),
            Binding::Value { kind, .. } => return Err(unsupported(&kind.to_string())),
            Binding::Sequence { element, target } if element.is_scalar() => {
                target.clear();
                (
                    Kind::Sequence,
                    Some(element),
                    Some(String::from("[]")),
                    Storage::Value(ValueStorage::Sequence(target)),
                )
            }
            Binding::Sequence { element, .. } => {
                return Err(unsupported_element(&element.to_string()));
            }
            Binding::Unsupported { type_name } => return Err(unsupported(type_name)),
            Binding::UnsupportedSequence { element } => return Err(unsupported_element(element)),
        };

        let primary_name = decompose_name(identifier);
        let placeholder = match placeholder {
            Some(placeholder) => placeholder.to_owned(),
            None => default_placeholder(&primary_name),
        };

        Ok(Self {
            identifier,
            alias: alias.map(str::to_lowercase),
            primary_name,
            help,
            placeholder,
            default,
            kind,
            element,
            storage,
        })
    }

    /// The field identifier this slot was described with
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier
    }

    #[inline]
    #[must_use]
    pub fn primary_name(&self) -> &str {
        &self.primary_name
    }

    #[inline]
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help
    }

    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The slot's value when it was registered, as help messages show it.
    /// Sequences are always empty at that point.
    #[inline]
    #[must_use]
    pub fn default_text(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// For a sequence slot, the kind of each element
    #[inline]
    #[must_use]
    pub fn element(&self) -> Option<Kind> {
        self.element
    }

    /// The name that usage messages show for this slot: the alias if there
    /// is one, otherwise the primary name.
    #[inline]
    #[must_use]
    pub fn usage_name(&self) -> &str {
        self.alias().unwrap_or(self.primary_name())
    }

    #[inline]
    pub(crate) fn storage_mut(&mut self) -> &mut Storage<'r> {
        &mut self.storage
    }
}

impl core::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slot")
            .field("identifier", &self.identifier)
            .field("primary_name", &self.primary_name)
            .field("alias", &self.alias)
            .field("default", &self.default)
            .field("kind", &self.kind)
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

/**
The name → slot mapping for one live record. It borrows each field of the
record mutably for `'r`, so the record can't be touched until the registry is
dropped.
*/
#[derive(Debug)]
pub struct Registry<'r> {
    names: HashMap<String, usize>,
    slots: Vec<Slot<'r>>,
}

impl<'r> Registry<'r> {
    /// Build a registry from a record's self-description. Fails on the first
    /// unsupported field or duplicate name; no partial registry is returned.
    pub fn build<R: Record + ?Sized>(record: &'r mut R) -> Result<Self, Error> {
        let mut fields = Fields::new();
        record.describe(&mut fields);
        Self::from_fields(fields)
    }

    pub fn from_fields(fields: Fields<'r>) -> Result<Self, Error> {
        let mut registry = Self {
            names: HashMap::with_capacity(fields.len() * 2),
            slots: Vec::with_capacity(fields.len()),
        };

        fields
            .into_iter()
            .try_for_each(|descriptor| registry.register(descriptor))?;

        Ok(registry)
    }

    fn register(&mut self, descriptor: FieldDescriptor<'r>) -> Result<(), Error> {
        let slot = Slot::from_descriptor(descriptor)?;
        let index = self.slots.len();

        self.claim(slot.primary_name(), index)?;
        if let Some(alias) = slot.alias() {
            self.claim(alias, index)?;
        }

        tracing::debug!(
            field = slot.identifier(),
            name = slot.primary_name(),
            alias = slot.alias(),
            kind = %slot.kind(),
            "registered slot"
        );

        self.slots.push(slot);
        Ok(())
    }

    fn claim(&mut self, name: &str, index: usize) -> Result<(), Error> {
        match self.names.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(Error::DuplicateName {
                name: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(index);
                Ok(())
            }
        }
    }

    /// Find the slot for a primary name or alias. Matching is exact but
    /// case-insensitive.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Slot<'r>> {
        let index = *self.names.get(&name.to_lowercase())?;
        self.slots.get(index)
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut Slot<'r>> {
        let index = *self.names.get(&name.to_lowercase())?;
        self.slots.get_mut(index)
    }

    /// All slots, in the order the record declared them
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[Slot<'r>] {
        &self.slots
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
