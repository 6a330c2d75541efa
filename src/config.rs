use std::fmt;

/// Version string written to `plugin.config_version` for new rule sets.
pub const DEFAULT_CONFIG_VERSION: &str = "1.0.0";

/// Default for `advanced.max_content_length`.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;

/// Where an append rule places its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Start,
    #[default]
    End,
}

impl Position {
    /// Parse a stored position. Anything other than `start` means `End`.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "start" => Position::Start,
            _ => Position::End,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Start => "start",
            Position::End => "end",
        }
    }
}

/// Matching flags handed to the regex compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFlags {
    pub ignore_case: bool,
    /// `^` and `$` match at line boundaries.
    pub multiline: bool,
}

/// The three rule lists, used to address a list from the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Replace,
    Delete,
    Append,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Replace => "replace",
            RuleKind::Delete => "delete",
            RuleKind::Append => "append",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitute every match of `pattern` with `replacement`.
///
/// `replacement` may reference capture groups with `$1` or `${name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceRule {
    pub pattern: String,
    pub replacement: String,
    pub enabled: bool,
    pub flags: RegexFlags,
    pub description: Option<String>,
}

impl ReplaceRule {
    /// A new enabled rule with default flags and a generated description.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let replacement = replacement.into();
        let description = format!("replace '{}' with '{}'", pattern, replacement);
        Self {
            pattern,
            replacement,
            enabled: true,
            flags: RegexFlags::default(),
            description: Some(description),
        }
    }
}

/// Remove every match of `pattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRule {
    pub pattern: String,
    pub enabled: bool,
    pub flags: RegexFlags,
    pub description: Option<String>,
}

impl DeleteRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let description = format!("delete '{}'", pattern);
        Self {
            pattern,
            enabled: true,
            flags: RegexFlags::default(),
            description: Some(description),
        }
    }
}

/// Add literal content before or after the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendRule {
    pub content: String,
    pub position: Position,
    pub enabled: bool,
    pub description: Option<String>,
}

impl AppendRule {
    pub fn new(content: impl Into<String>, position: Position) -> Self {
        let content = content.into();
        let label = match position {
            Position::Start => "prefix",
            Position::End => "suffix",
        };
        let description = format!("{} '{}'", label, content);
        Self {
            content,
            position,
            enabled: true,
            description: Some(description),
        }
    }
}

/// Settings that do not change how rules are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedSettings {
    /// Advisory upper bound for processed text; not enforced by the engine.
    pub max_content_length: usize,
    /// Log previews of changed messages instead of just their lengths.
    pub log_changes: bool,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            log_changes: false,
        }
    }
}

/// The complete, ordered rule set.
///
/// List order is application order and also the 1-based numbering shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub enabled: bool,
    pub config_version: String,
    pub replace_rules: Vec<ReplaceRule>,
    pub delete_rules: Vec<DeleteRule>,
    pub append_rules: Vec<AppendRule>,
    pub advanced: AdvancedSettings,
}

impl RuleSet {
    /// An enabled rule set with no rules.
    pub fn empty() -> Self {
        Self {
            enabled: true,
            config_version: DEFAULT_CONFIG_VERSION.to_string(),
            replace_rules: Vec::new(),
            delete_rules: Vec::new(),
            append_rules: Vec::new(),
            advanced: AdvancedSettings::default(),
        }
    }

    pub fn len_of(&self, kind: RuleKind) -> usize {
        match kind {
            RuleKind::Replace => self.replace_rules.len(),
            RuleKind::Delete => self.delete_rules.len(),
            RuleKind::Append => self.append_rules.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.replace_rules.is_empty() && self.delete_rules.is_empty() && self.append_rules.is_empty()
    }
}

/// The rule set written on first use: two sample replacements and one sample deletion.
impl Default for RuleSet {
    fn default() -> Self {
        let mut negatives = ReplaceRule::new("(糟糕|坏|不好)", "好");
        negatives.description = Some("replace negative words with '好'".to_string());

        Self {
            replace_rules: vec![ReplaceRule::new("不可以", "可以"), negatives],
            delete_rules: vec![DeleteRule::new("问题")],
            ..Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run_contents() {
        let set = RuleSet::default();
        assert!(set.enabled);
        assert_eq!(set.config_version, "1.0.0");
        assert_eq!(set.replace_rules.len(), 2);
        assert_eq!(set.delete_rules.len(), 1);
        assert!(set.append_rules.is_empty());
        assert_eq!(set.advanced.max_content_length, 10_000);
        assert!(!set.advanced.log_changes);
        assert_eq!(set.replace_rules[0].pattern, "不可以");
        assert_eq!(set.delete_rules[0].pattern, "问题");
    }

    #[test]
    fn unknown_position_is_end() {
        assert_eq!(Position::from_config("start"), Position::Start);
        assert_eq!(Position::from_config(" START "), Position::Start);
        assert_eq!(Position::from_config("end"), Position::End);
        assert_eq!(Position::from_config("middle"), Position::End);
        assert_eq!(Position::from_config(""), Position::End);
    }

    #[test]
    fn generated_descriptions() {
        assert_eq!(
            ReplaceRule::new("a", "b").description.as_deref(),
            Some("replace 'a' with 'b'")
        );
        assert_eq!(DeleteRule::new("x").description.as_deref(), Some("delete 'x'"));
        assert_eq!(
            AppendRule::new("sig", Position::End).description.as_deref(),
            Some("suffix 'sig'")
        );
        assert_eq!(
            AppendRule::new("hi", Position::Start).description.as_deref(),
            Some("prefix 'hi'")
        );
    }

    #[test]
    fn new_rules_are_enabled_with_plain_flags() {
        let rule = ReplaceRule::new("a", "b");
        assert!(rule.enabled);
        assert_eq!(rule.flags, RegexFlags::default());
    }
}
