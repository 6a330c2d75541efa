use crate::config::{
    AdvancedSettings, AppendRule, DeleteRule, Position, RegexFlags, ReplaceRule, RuleSet,
    DEFAULT_CONFIG_VERSION, DEFAULT_MAX_CONTENT_LENGTH,
};
use serde::{Deserialize, Serialize};

/// Top-level TOML config file structure.
///
/// Field order is the order sections are written in: plugin metadata, rules, advanced settings.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub plugin: PluginSection,
    #[serde(default)]
    pub rules: RulesSection,
    #[serde(default)]
    pub advanced: AdvancedSection,
}

/// The `[plugin]` section.
#[derive(Debug, Deserialize, Serialize)]
pub struct PluginSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_config_version")]
    pub config_version: String,
}

impl Default for PluginSection {
    fn default() -> Self {
        Self {
            enabled: true,
            config_version: default_config_version(),
        }
    }
}

/// The `[rules]` section holding the three rule lists.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RulesSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace_rules: Vec<TomlReplaceRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete_rules: Vec<TomlDeleteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub append_rules: Vec<TomlAppendRule>,
}

/// A single `[[rules.replace_rules]]` entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct TomlReplaceRule {
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub ignore_case: bool,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single `[[rules.delete_rules]]` entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct TomlDeleteRule {
    #[serde(default)]
    pub pattern: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub ignore_case: bool,
    #[serde(default)]
    pub multiline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single `[[rules.append_rules]]` entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct TomlAppendRule {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `[advanced]` section.
#[derive(Debug, Deserialize, Serialize)]
pub struct AdvancedSection {
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
    #[serde(default)]
    pub log_changes: bool,
}

impl Default for AdvancedSection {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            log_changes: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_config_version() -> String {
    DEFAULT_CONFIG_VERSION.into()
}

fn default_position() -> String {
    "end".into()
}

fn default_max_content_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

impl TomlConfig {
    /// Convert to the core `RuleSet` type.
    pub fn to_rule_set(&self) -> RuleSet {
        RuleSet {
            enabled: self.plugin.enabled,
            config_version: self.plugin.config_version.clone(),
            replace_rules: self
                .rules
                .replace_rules
                .iter()
                .map(|r| ReplaceRule {
                    pattern: r.pattern.clone(),
                    replacement: r.replacement.clone(),
                    enabled: r.enabled,
                    flags: RegexFlags {
                        ignore_case: r.ignore_case,
                        multiline: r.multiline,
                    },
                    description: r.description.clone(),
                })
                .collect(),
            delete_rules: self
                .rules
                .delete_rules
                .iter()
                .map(|r| DeleteRule {
                    pattern: r.pattern.clone(),
                    enabled: r.enabled,
                    flags: RegexFlags {
                        ignore_case: r.ignore_case,
                        multiline: r.multiline,
                    },
                    description: r.description.clone(),
                })
                .collect(),
            append_rules: self
                .rules
                .append_rules
                .iter()
                .map(|r| AppendRule {
                    content: r.content.clone(),
                    position: Position::from_config(&r.position),
                    enabled: r.enabled,
                    description: r.description.clone(),
                })
                .collect(),
            advanced: AdvancedSettings {
                max_content_length: self.advanced.max_content_length,
                log_changes: self.advanced.log_changes,
            },
        }
    }

    /// Build the on-disk shape of a `RuleSet`.
    pub fn from_rule_set(set: &RuleSet) -> Self {
        Self {
            plugin: PluginSection {
                enabled: set.enabled,
                config_version: set.config_version.clone(),
            },
            rules: RulesSection {
                replace_rules: set
                    .replace_rules
                    .iter()
                    .map(|r| TomlReplaceRule {
                        pattern: r.pattern.clone(),
                        replacement: r.replacement.clone(),
                        enabled: r.enabled,
                        ignore_case: r.flags.ignore_case,
                        multiline: r.flags.multiline,
                        description: r.description.clone(),
                    })
                    .collect(),
                delete_rules: set
                    .delete_rules
                    .iter()
                    .map(|r| TomlDeleteRule {
                        pattern: r.pattern.clone(),
                        enabled: r.enabled,
                        ignore_case: r.flags.ignore_case,
                        multiline: r.flags.multiline,
                        description: r.description.clone(),
                    })
                    .collect(),
                append_rules: set
                    .append_rules
                    .iter()
                    .map(|r| TomlAppendRule {
                        content: r.content.clone(),
                        position: r.position.as_str().to_string(),
                        enabled: r.enabled,
                        description: r.description.clone(),
                    })
                    .collect(),
            },
            advanced: AdvancedSection {
                max_content_length: set.advanced.max_content_length,
                log_changes: set.advanced.log_changes,
            },
        }
    }
}
