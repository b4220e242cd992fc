use core::fmt::Display;

use lazy_format::lazy_format;

/// Print a flag name the way it would be typed: `-v` for a single character,
/// `--verbose` otherwise.
pub fn dashed(name: &str) -> impl Display + '_ {
    lazy_format!(match (name.chars().nth(1)) {
        None => "-{name}",
        Some(_) => "--{name}",
    })
}
