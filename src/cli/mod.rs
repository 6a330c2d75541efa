pub mod dispatch;
pub mod format;
pub mod toml_config;

use crate::config::RuleKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "regex-filter",
    version,
    about = "Rewrite messages with an ordered set of regex replace/delete/append rules"
)]
pub struct Cli {
    /// Rule set file
    #[arg(
        long,
        short,
        global = true,
        env = "REGEX_FILTER_CONFIG",
        default_value = "regex_filter.toml"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show every rule with its 1-based index
    #[command(visible_alias = "show")]
    List {
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
    /// Add a replace rule (pattern + replacement), a delete rule (pattern only),
    /// or a prefix/suffix rule
    Add {
        /// Regex to match
        pattern: Option<String>,

        /// Replacement text; remaining words are joined with spaces
        replacement: Vec<String>,

        /// Literal text to add after the message (\n and \t are expanded)
        #[arg(long, conflicts_with_all = ["pattern", "replacement", "prepend"])]
        append: Option<String>,

        /// Literal text to add before the message (\n and \t are expanded)
        #[arg(long, conflicts_with_all = ["pattern", "replacement"])]
        prepend: Option<String>,
    },
    /// Remove a rule by kind and 1-based index
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_enum)]
        kind: KindArg,

        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Enable or disable the whole rule set
    Toggle,
    /// Preview the replace and delete rules on some text without saving
    Test {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
    /// Run the full pipeline on text from --text or stdin
    Apply {
        #[arg(long)]
        text: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Replace,
    Delete,
    Append,
}

impl From<KindArg> for RuleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Replace => RuleKind::Replace,
            KindArg::Delete => RuleKind::Delete,
            KindArg::Append => RuleKind::Append,
        }
    }
}
