use crate::config::{AppendRule, Position, RuleKind};
use crate::rules::TextRule;
use std::borrow::Cow;

impl TextRule for AppendRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Append
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn pattern(&self) -> &str {
        &self.content
    }

    fn apply<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, regex::Error> {
        if self.content.is_empty() {
            return Ok(Cow::Borrowed(text));
        }
        let mut out = String::with_capacity(text.len() + self.content.len());
        match self.position {
            Position::Start => {
                out.push_str(&self.content);
                out.push_str(text);
            }
            Position::End => {
                out.push_str(text);
                out.push_str(&self.content);
            }
        }
        Ok(Cow::Owned(out))
    }
}
