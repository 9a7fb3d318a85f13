//! Resolved, read-only settings for one run.

use vesper_formatter::FormatOptions;

use crate::registry::{Rule, RuleTable};

pub mod options;

pub use options::Options;

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub format: FormatOptions,
    pub rules: RuleTable,
}

impl Settings {
    pub fn from_options(options: &Options) -> Self {
        options.resolve()
    }

    /// A settings object with exactly one rule enabled, for tests.
    pub fn for_rule(rule: Rule) -> Self {
        Self {
            format: FormatOptions::default(),
            rules: RuleTable::from_rules([rule]),
        }
    }

    /// A settings object with exactly these rules enabled, for tests.
    pub fn for_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            format: FormatOptions::default(),
            rules: RuleTable::from_rules(rules),
        }
    }
}
