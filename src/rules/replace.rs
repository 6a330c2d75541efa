use crate::config::{ReplaceRule, RuleKind};
use crate::rules::{compile, TextRule};
use std::borrow::Cow;

impl TextRule for ReplaceRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Replace
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, regex::Error> {
        let re = compile(&self.pattern, self.flags)?;
        Ok(re.replace_all(text, self.replacement.as_str()))
    }
}
