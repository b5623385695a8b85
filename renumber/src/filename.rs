use std::sync::OnceLock;

use regex::Regex;

use crate::error::RenumberError;

/// A `_t<NNN>_` field located in a base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timepoint {
    /// Byte offset of the leading `_`.
    pub start: usize,
    /// Byte offset just past the trailing `_`.
    pub end: usize,
    pub value: u32,
}

fn compile_timepoint_regex() -> Regex {
    #![allow(clippy::expect_used)]
    Regex::new(r"_t([0-9]{3})_").expect("timepoint pattern should compile")
}

fn timepoint_regex() -> &'static Regex {
    static TIMEPOINT: OnceLock<Regex> = OnceLock::new();
    TIMEPOINT.get_or_init(compile_timepoint_regex)
}

/// Splits `name` into base and extension.
///
/// The extension starts at the last `.`, unless everything before that dot is
/// dots too (`.hidden`, `..tif`), in which case there is no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let Some(dot) = name.rfind('.') else {
        return (name, "");
    };
    if name[..dot].chars().all(|c| c == '.') {
        return (name, "");
    }
    name.split_at(dot)
}

/// Returns the first `_t<NNN>_` field in `base`, if any.
pub fn find_timepoint(base: &str) -> Option<Timepoint> {
    let captures = timepoint_regex().captures(base)?;
    let field = captures.get(0)?;
    let value = captures.get(1)?.as_str().parse().ok()?;
    Some(Timepoint {
        start: field.start(),
        end: field.end(),
        value,
    })
}

/// Returns `name` with its timepoint index incremented by one.
///
/// Only the first `_t<NNN>_` field of the base name is rewritten; everything
/// else, including the extension, is kept byte for byte. The new index is
/// zero-padded to three digits but never truncated, so `t999` becomes
/// `t1000`. Only ASCII digits `0-9` count as part of the field.
pub fn increment_filename(name: &str) -> Result<String, RenumberError> {
    let (base, ext) = split_extension(name);
    let Some(timepoint) = find_timepoint(base) else {
        return Err(RenumberError::InvalidFormat {
            filename: name.to_string(),
        });
    };
    tracing::debug!(filename = name, number = timepoint.value, "found a number");

    let prefix = &base[..timepoint.start];
    let suffix = &base[timepoint.end..];
    let next = timepoint.value + 1;
    Ok(format!("{prefix}_t{next:03}_{suffix}{ext}"))
}
