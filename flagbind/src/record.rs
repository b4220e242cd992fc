/*!
The record-description protocol. A [`Record`] describes its fields, in
declaration order, as a list of [`FieldDescriptor`]s, each holding a
[`Binding`]: a kind-tagged mutable borrow of the field's storage. The
[`Registry`][crate::registry::Registry] only ever sees these descriptors.

Usually you'll `#[derive(Record)]` instead of implementing it by hand.
 */

use core::{any::type_name, fmt};
use std::error::Error as StdError;

use crate::errors::ValueError;

/// The kind of value a slot holds. A slot's kind is fixed when it is
/// registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float32,
    Float64,
    String,
    Sequence,
    Convertible,
}

impl Kind {
    /// Kinds that can be coerced from a single piece of text. These are the
    /// only kinds allowed as the element of a sequence.
    #[inline]
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Kind::Bool | Kind::Sequence)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::Sequence => "sequence",
            Kind::Convertible => "convertible",
        })
    }
}

/**
Types that know how to build themselves from a command-line string.

Implement this for your own types to make them usable as fields (or as
elements of a `Vec` field) of a [`Record`]. The error is surfaced unchanged as
the source of [`Error::Conversion`][crate::Error::Conversion].
*/
pub trait Convertible: Sized {
    type Err: Into<Box<dyn StdError + Send + Sync>>;

    fn parse_from_string(text: &str) -> Result<Self, Self::Err>;

    /// How the current value is shown as the default in help messages.
    /// `None` shows the placeholder instead.
    fn render_default(&self) -> Option<String> {
        None
    }
}

/**
A value that can be coerced from a single command-line string: the integer
and float primitives, [`String`][std::string::String], and every
[`Convertible`] type.
*/
pub trait Element: Sized {
    const KIND: Kind;

    fn coerce(text: &str) -> Result<Self, ValueError>;

    fn render_default(&self) -> Option<String>;
}

impl<T: Convertible> Element for T {
    const KIND: Kind = Kind::Convertible;

    #[inline]
    fn coerce(text: &str) -> Result<Self, ValueError> {
        T::parse_from_string(text).map_err(|err| ValueError::Conversion(err.into()))
    }

    #[inline]
    fn render_default(&self) -> Option<String> {
        Convertible::render_default(self)
    }
}

/// Type-erased storage for a single-valued slot.
pub trait Assign {
    fn assign(&mut self, text: &str) -> Result<(), ValueError>;

    /// The current value, as help messages show it
    fn render_current(&self) -> Option<String>;
}

impl<T: Element> Assign for T {
    #[inline]
    fn assign(&mut self, text: &str) -> Result<(), ValueError> {
        *self = T::coerce(text)?;
        Ok(())
    }

    #[inline]
    fn render_current(&self) -> Option<String> {
        Element::render_default(self)
    }
}

/// Type-erased storage for a sequence slot. Each occurrence of the flag
/// appends one element.
pub trait Accumulate {
    fn clear(&mut self);

    fn accumulate(&mut self, text: &str) -> Result<(), ValueError>;
}

impl<T: Element> Accumulate for Vec<T> {
    #[inline]
    fn clear(&mut self) {
        Vec::clear(self)
    }

    #[inline]
    fn accumulate(&mut self, text: &str) -> Result<(), ValueError> {
        T::coerce(text).map(|value| self.push(value))
    }
}

/**
A kind-tagged handle to one field of a live record. The binding borrows the
field for `'r`; the record keeps ownership.

The `Unsupported` variants exist so that a record can *describe* a field
that can't be bound; the registry rejects them when it's built.
 */
pub enum Binding<'r> {
    Flag(&'r mut bool),
    Value {
        kind: Kind,
        target: &'r mut dyn Assign,
    },
    Sequence {
        element: Kind,
        target: &'r mut dyn Accumulate,
    },
    Unsupported {
        type_name: &'static str,
    },
    UnsupportedSequence {
        element: &'static str,
    },
}

impl<'r> Binding<'r> {
    #[inline]
    pub fn of<T: Bindable>(field: &'r mut T) -> Self {
        field.binding()
    }

    #[inline]
    #[must_use]
    pub fn unsupported<T: ?Sized>() -> Self {
        Self::Unsupported {
            type_name: type_name::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn unsupported_sequence<E>() -> Self {
        Self::UnsupportedSequence {
            element: type_name::<E>(),
        }
    }
}

impl fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Binding::Flag(ref flag) => f.debug_tuple("Flag").field(flag).finish(),
            Binding::Value { kind, .. } => f.debug_struct("Value").field("kind", &kind).finish(),
            Binding::Sequence { element, .. } => f
                .debug_struct("Sequence")
                .field("element", &element)
                .finish(),
            Binding::Unsupported { type_name } => f
                .debug_struct("Unsupported")
                .field("type_name", &type_name)
                .finish(),
            Binding::UnsupportedSequence { element } => f
                .debug_struct("UnsupportedSequence")
                .field("element", &element)
                .finish(),
        }
    }
}

/// Types that can back a slot: `bool` flags, every [`Element`], and `Vec`s
/// of elements.
pub trait Bindable {
    fn binding(&mut self) -> Binding<'_>;
}

impl Bindable for bool {
    #[inline]
    fn binding(&mut self) -> Binding<'_> {
        Binding::Flag(self)
    }
}

impl<T: Element> Bindable for T {
    #[inline]
    fn binding(&mut self) -> Binding<'_> {
        Binding::Value {
            kind: T::KIND,
            target: self,
        }
    }
}

impl<T: Element> Bindable for Vec<T> {
    #[inline]
    fn binding(&mut self) -> Binding<'_> {
        Binding::Sequence {
            element: T::KIND,
            target: self,
        }
    }
}

/// One entry of a record description
#[derive(Debug)]
pub struct FieldDescriptor<'r> {
    pub(crate) identifier: &'r str,
    pub(crate) binding: Binding<'r>,
    pub(crate) alias: Option<&'r str>,
    pub(crate) help: Option<&'r str>,
    pub(crate) placeholder: Option<&'r str>,
}

impl<'r> FieldDescriptor<'r> {
    /// Describe a field. `identifier` is decomposed into the flag's primary
    /// name, so both `DummyArg` and `dummy_arg` become `--dummy-arg`.
    #[must_use]
    pub fn new(identifier: &'r str, binding: Binding<'r>) -> Self {
        Self {
            identifier,
            binding,
            alias: None,
            help: None,
            placeholder: None,
        }
    }

    /// A second name for the flag, typically a single letter
    #[must_use]
    pub fn alias(self, alias: &'r str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    #[must_use]
    pub fn help(self, help: &'r str) -> Self {
        Self {
            help: Some(help),
            ..self
        }
    }

    /// The name of the flag's value in usage messages
    #[must_use]
    pub fn placeholder(self, placeholder: &'r str) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..self
        }
    }
}

/// The ordered field list a [`Record`] fills in.
#[derive(Debug, Default)]
pub struct Fields<'r> {
    fields: Vec<FieldDescriptor<'r>>,
}

impl<'r> Fields<'r> {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn push(&mut self, field: FieldDescriptor<'r>) {
        self.fields.push(field);
    }

    /// Shorthand for pushing a field with no metadata
    pub fn field<T: Bindable>(&mut self, identifier: &'r str, field: &'r mut T) {
        self.push(FieldDescriptor::new(identifier, Binding::of(field)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'r> IntoIterator for Fields<'r> {
    type Item = FieldDescriptor<'r>;
    type IntoIter = std::vec::IntoIter<FieldDescriptor<'r>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/**
A configuration record whose fields can be bound from command-line flags.

`describe` must push one [`FieldDescriptor`] per field, in declaration order;
that order is the order of the usage message. Field storage stays owned by
the record, and is only borrowed for `'r`.
*/
pub trait Record {
    /// A description of the whole program, shown in the help message. The
    /// derive fills this in from the type's doc comment.
    const DESCRIPTION: &'static str = "";

    fn describe<'r>(&'r mut self, fields: &mut Fields<'r>);
}

/// Autoref probes used by `#[derive(Record)]` to classify a field's type
/// without failing to compile on unsupported types. Not public API.
#[doc(hidden)]
pub mod probe {
    use core::marker::PhantomData;

    use super::{Bindable, Binding, Element};

    pub struct BindableTag;
    pub struct UnsupportedTag;
    pub struct UnsupportedElementTag;

    impl BindableTag {
        #[inline]
        pub fn binding<T: Bindable>(self, field: &mut T) -> Binding<'_> {
            field.binding()
        }
    }

    impl UnsupportedTag {
        #[inline]
        pub fn binding<T>(self, _field: &mut T) -> Binding<'_> {
            Binding::unsupported::<T>()
        }
    }

    impl UnsupportedElementTag {
        #[inline]
        pub fn binding<E>(self, _field: &mut Vec<E>) -> Binding<'_> {
            Binding::unsupported_sequence::<E>()
        }
    }

    pub trait BindableProbe {
        #[inline]
        fn flagbind_probe(&self) -> BindableTag {
            BindableTag
        }
    }

    impl<T: Bindable> BindableProbe for T {}

    pub trait FallbackProbe {
        #[inline]
        fn flagbind_probe(&self) -> UnsupportedTag {
            UnsupportedTag
        }
    }

    impl<T> FallbackProbe for &T {}

    /// Stand-in for the element type of a `Vec` field
    pub struct ElementOf<E>(PhantomData<E>);

    impl<E> ElementOf<E> {
        #[inline]
        #[must_use]
        pub fn new() -> Self {
            Self(PhantomData)
        }
    }

    impl<E> Default for ElementOf<E> {
        fn default() -> Self {
            Self::new()
        }
    }

    pub trait ElementProbe {
        #[inline]
        fn flagbind_element_probe(&self) -> BindableTag {
            BindableTag
        }
    }

    impl<E: Element> ElementProbe for ElementOf<E> {}

    pub trait ElementFallbackProbe {
        #[inline]
        fn flagbind_element_probe(&self) -> UnsupportedElementTag {
            UnsupportedElementTag
        }
    }

    impl<E> ElementFallbackProbe for &ElementOf<E> {}
}
