use crate::config::{DeleteRule, RuleKind};
use crate::rules::{compile, TextRule};
use regex::NoExpand;
use std::borrow::Cow;

impl TextRule for DeleteRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Delete
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, regex::Error> {
        let re = compile(&self.pattern, self.flags)?;
        Ok(re.replace_all(text, NoExpand("")))
    }
}
