//! Parser for the `.hk` configuration DSL.
//!
//! The format is line oriented.  Each line is trimmed, then:
//!
//! | line shape              | effect                                     |
//! |-------------------------|--------------------------------------------|
//! | empty, or `! …`         | comment, ignored                           |
//! | `[name]`                | current section becomes `name` lowercased  |
//! | `-> key => value`       | assignment in the current section          |
//! | anything else           | ignored                                    |
//!
//! Assignments seen before any section header are dropped, as are
//! assignments under a section name that is not one of the four known
//! sections.  Parsing never fails.

use super::{Config, Overrides, Section, Value};
use log::debug;

/// The section an assignment currently lands in.
#[derive(Debug)]
enum Scope {
    /// No header seen yet.
    Unset,
    Known(Section),
    /// A header naming no known section.
    Foreign(String),
}

/// Parse `text` into a full configuration, starting from the defaults.
pub fn parse(text: &str) -> Config {
    Config::default().merge(&parse_overrides(text))
}

/// Parse `text` into the sparse set of assignments it makes to known
/// sections.  Keys are not validated here; [`Config::merge`] drops the
/// ones a section does not have.
pub fn parse_overrides(text: &str) -> Overrides {
    let mut overrides = Overrides::new();
    let mut scope = Scope::Unset;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        if let Some(name) = section_header(line) {
            let name = name.to_lowercase();
            scope = match Section::from_name(&name) {
                Some(section) => Scope::Known(section),
                None => Scope::Foreign(name),
            };
            continue;
        }

        match (assignment(line), &scope) {
            (Some((key, value)), Scope::Known(section)) => {
                overrides.set(*section, key, Value::from_text(value));
            }
            (Some((key, _)), Scope::Foreign(name)) => {
                debug!("line {}: {}.{} has no effect", index + 1, name, key);
            }
            (Some((key, _)), Scope::Unset) => {
                debug!("line {}: {} assigned outside any section", index + 1, key);
            }
            (None, _) => {
                debug!("line {}: ignoring {:?}", index + 1, line);
            }
        }
    }

    overrides
}

/// `[name]` → `name`.
fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// `-> key => value` → `(key, value)`, both trimmed.
///
/// The key ends at the first `=>` that has whitespace on both sides, so
/// values may themselves contain `=>`.
fn assignment(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix("->")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut from = 0;
    while let Some(pos) = rest[from..].find("=>") {
        let at = from + pos;
        let before = &rest[..at];
        let after = &rest[at + 2..];
        if before.ends_with(char::is_whitespace) && after.starts_with(char::is_whitespace) {
            let key = before.trim();
            if key.is_empty() {
                return None;
            }
            return Some((key, after.trim()));
        }
        from = at + 2;
    }
    None
}

/// Decide whether `text` is numeric and, if so, its value.
///
/// Accepted: decimal floats with optional sign and exponent (`12`, `-0.5`,
/// `.5`, `1e3`), `Infinity` with optional sign, and unsigned `0x`/`0o`/`0b`
/// integers of any length (rounded to the nearest `f64`).  Empty text, `NaN` and other spellings of infinity are not
/// numbers.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    match text {
        "" => return None,
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            if digits.is_empty() {
                return None;
            }
            return digits.chars().try_fold(0.0, |acc: f64, c| {
                c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
            });
        }
    }

    // f64's parser also takes "inf" and "nan"; those stay text.
    if text
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    text.parse::<f64>().ok()
}
