pub mod append;
pub mod delete;
pub mod replace;

use crate::config::{RegexFlags, RuleKind};
use crate::error::PatternError;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// One step of the transform pipeline.
pub trait TextRule {
    fn kind(&self) -> RuleKind;

    fn is_enabled(&self) -> bool;

    /// Text shown in logs when the rule fails.
    fn pattern(&self) -> &str;

    /// Apply the rule to `text`. Borrows when nothing changed.
    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, regex::Error>;
}

/// Compile `pattern` with the given flags.
pub fn compile(pattern: &str, flags: RegexFlags) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.ignore_case)
        .multi_line(flags.multiline)
        .build()
}

/// Check that a pattern compiles before it is accepted into the store.
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    compile(pattern, RegexFlags::default())
        .map(|_| ())
        .map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })
}
