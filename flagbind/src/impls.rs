/*!
Implementations of [`Element`] for the primitive number types and `String`,
along with the text-to-number parsing they share.
 */

use crate::{
    errors::ValueError,
    record::{Element, Kind},
};

/// Split an integer literal into its radix and digits. `0x`, `0o` and `0b`
/// prefixes are recognized, and a leading `0` alone means octal.
fn split_radix(text: &str) -> (u32, &str) {
    match text.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &text[2..]),
        [b'0', b'o' | b'O', ..] => (8, &text[2..]),
        [b'0', b'b' | b'B', ..] => (2, &text[2..]),
        [b'0', _, ..] => (8, &text[1..]),
        _ => (10, text),
    }
}

/// `_` may separate digits, or follow a radix prefix (`1_000`, `0x_ff`), but
/// can't lead an unprefixed literal, trail, or repeat.
fn underscores_ok(prefixed: bool, digits: &str) -> bool {
    (prefixed || !digits.starts_with('_')) && !digits.ends_with('_') && !digits.contains("__")
}

fn parse_magnitude(text: &str) -> Option<u128> {
    let (radix, digits) = split_radix(text);
    let prefixed = digits.len() < text.len();

    if !underscores_ok(prefixed, digits) {
        return None;
    }

    let digits = digits.replace('_', "");

    // from_str_radix would accept a second sign here
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    u128::from_str_radix(&digits, radix).ok()
}

/// Parse a signed integer literal. Range checks against the target width
/// happen afterwards.
pub(crate) fn parse_signed(text: &str) -> Option<i128> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = parse_magnitude(unsigned)?;

    match negative {
        false => i128::try_from(magnitude).ok(),
        true => 0i128.checked_sub_unsigned(magnitude),
    }
}

/// Parse an unsigned integer literal. Signs aren't allowed at all, not even
/// `+`.
pub(crate) fn parse_unsigned(text: &str) -> Option<u128> {
    parse_magnitude(text)
}

fn is_infinity_literal(text: &str) -> bool {
    let text = text.strip_prefix(['+', '-']).unwrap_or(text);

    text.eq_ignore_ascii_case("inf") || text.eq_ignore_ascii_case("infinity")
}

macro_rules! integers {
    ($kind:ident via $parse:ident: $($type:ident)*) => {$(
        impl Element for $type {
            const KIND: Kind = Kind::$kind;

            #[inline]
            fn coerce(text: &str) -> Result<Self, ValueError> {
                $parse(text)
                    .and_then(|value| $type::try_from(value).ok())
                    .ok_or(ValueError::Invalid(Kind::$kind))
            }

            #[inline]
            fn render_default(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
    )*};
}

integers! { Int via parse_signed: i8 i16 i32 i64 isize }
integers! { Uint via parse_unsigned: u8 u16 u32 u64 usize }

macro_rules! floats {
    ($($type:ident => $kind:ident)*) => {$(
        impl Element for $type {
            const KIND: Kind = Kind::$kind;

            fn coerce(text: &str) -> Result<Self, ValueError> {
                match text.parse::<$type>() {
                    Ok(value) if value.is_infinite() && !is_infinity_literal(text) => {
                        Err(ValueError::Invalid(Kind::$kind))
                    }
                    Ok(value) => Ok(value),
                    Err(_) => Err(ValueError::Invalid(Kind::$kind)),
                }
            }

            #[inline]
            fn render_default(&self) -> Option<String> {
                Some(self.to_string())
            }
        }
    )*};
}

floats! {
    f32 => Float32
    f64 => Float64
}

impl Element for String {
    const KIND: Kind = Kind::String;

    #[inline]
    fn coerce(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_owned())
    }

    #[inline]
    fn render_default(&self) -> Option<String> {
        Some(format!("{self:?}"))
    }
}
