//! `{}` template substitution used to display values.
//!
//! Placeholders are filled left to right, one argument each. Arguments beyond the last
//! placeholder are ignored, and placeholders left without an argument are emitted literally
//! together with the rest of the template:
//!
//! ```
//! use rcvalue::fmt::{substitute, substitute_ints, INT_SENTINEL};
//!
//! assert_eq!(substitute("{} and {}", [1, 2]), "1 and 2");
//! assert_eq!(substitute("{} and {}", [1]), "1 and {}");
//! assert_eq!(substitute_ints("{} and {}", &[1, INT_SENTINEL, 2]), "1 and {}");
//! ```
//!
//! The sentinel-terminated forms ([`substitute_ints`], [`substitute_texts`]) accept argument
//! lists whose end is marked in-band, and only consume the arguments before the marker.
use std::{
    fmt::{self, Display, Write as _},
    io,
};

/// Placeholder token recognised in templates.
pub const PLACEHOLDER: &str = "{}";

/// Reserved integer terminating an integer argument list.
pub const INT_SENTINEL: i64 = i64::MAX;

/// Write `template` into `out`, replacing each `{}` with the next argument.
pub fn write_template<W, I>(out: &mut W, template: &str, args: I) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    I: IntoIterator,
    I::Item: Display,
{
    let mut rest = template;
    for arg in args {
        let Some(at) = rest.find(PLACEHOLDER) else {
            break;
        };
        out.write_str(&rest[..at])?;
        write!(out, "{}", arg)?;
        rest = &rest[at + PLACEHOLDER.len()..];
    }
    out.write_str(rest)
}

/// Substitute `args` into `template` and return the result.
pub fn substitute<I>(template: &str, args: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::with_capacity(template.len());
    // Writing into a `String` cannot fail.
    let _ = write_template(&mut out, template, args);
    out
}

/// Substitute integers up to (excluding) the first [`INT_SENTINEL`].
pub fn substitute_ints(template: &str, args: &[i64]) -> String {
    substitute(
        template,
        args.iter().take_while(|&&arg| arg != INT_SENTINEL),
    )
}

/// Substitute texts up to (excluding) the first `None`.
pub fn substitute_texts(template: &str, args: &[Option<&str>]) -> String {
    substitute(template, args.iter().map_while(|arg| *arg))
}

/// Substitute `args` into `template` and write the result to `out`.
pub fn emit<W, I>(out: &mut W, template: &str, args: I) -> io::Result<()>
where
    W: io::Write + ?Sized,
    I: IntoIterator,
    I::Item: Display,
{
    out.write_all(substitute(template, args).as_bytes())
}
