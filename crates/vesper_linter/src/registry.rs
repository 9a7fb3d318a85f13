//! Registry of every rule the linter and formatter know about.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Rule {
    // Documentation
    MissingDocumentation,
    DocCommentConsistency,
    // Naming
    LowerCamelCase,
    LeadingUnderscore,
    // Style (lint only)
    AmbiguousTrailingClosure,
    DuplicateTrailingClosure,
    // Style (rewriting)
    RedundantParentheses,
    ShorthandTypeNames,
    PreferWhereClause,
    // Whitespace
    TrailingWhitespace,
    Indentation,
    Spacing,
    BlankLines,
    LineTooLong,
}

impl Rule {
    /// The stable name used in configuration files and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Rule::MissingDocumentation => "missing-documentation",
            Rule::DocCommentConsistency => "doc-comment-consistency",
            Rule::LowerCamelCase => "lower-camel-case",
            Rule::LeadingUnderscore => "leading-underscore",
            Rule::AmbiguousTrailingClosure => "ambiguous-trailing-closure",
            Rule::DuplicateTrailingClosure => "duplicate-trailing-closure",
            Rule::RedundantParentheses => "redundant-parentheses",
            Rule::ShorthandTypeNames => "shorthand-type-names",
            Rule::PreferWhereClause => "prefer-where-clause",
            Rule::TrailingWhitespace => "trailing-whitespace",
            Rule::Indentation => "indentation",
            Rule::Spacing => "spacing",
            Rule::BlankLines => "blank-lines",
            Rule::LineTooLong => "line-too-long",
        }
    }

    /// Rewriting rules produce a new tree; the rest only diagnose.
    pub const fn is_rewrite(self) -> bool {
        matches!(
            self,
            Rule::RedundantParentheses | Rule::ShorthandTypeNames | Rule::PreferWhereClause
        )
    }

    /// Whitespace rules come out of the printed/original comparison rather
    /// than the AST walk.
    pub const fn is_whitespace(self) -> bool {
        matches!(
            self,
            Rule::TrailingWhitespace
                | Rule::Indentation
                | Rule::Spacing
                | Rule::BlankLines
                | Rule::LineTooLong
        )
    }

    /// Whether the rule still applies in files that import the designated
    /// test module.
    pub const fn applies_to_test_code(self) -> bool {
        !matches!(self, Rule::MissingDocumentation | Rule::LowerCamelCase)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Rule::iter().find(|rule| rule.name() == name).ok_or(())
    }
}

/// The set of enabled rules, resolved from the configuration.
#[derive(Debug, Clone)]
pub struct RuleTable {
    enabled: FxHashSet<Rule>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self {
            enabled: FxHashSet::default(),
        }
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            enabled: rules.into_iter().collect(),
        }
    }

    pub fn enabled(&self, rule: Rule) -> bool {
        self.enabled.contains(&rule)
    }

    pub fn enable(&mut self, rule: Rule) {
        self.enabled.insert(rule);
    }

    pub fn disable(&mut self, rule: Rule) {
        self.enabled.remove(&rule);
    }

    pub fn any_enabled(&self, predicate: impl Fn(Rule) -> bool) -> bool {
        self.enabled.iter().copied().any(predicate)
    }

    pub fn iter_enabled(&self) -> impl Iterator<Item = Rule> + '_ {
        Rule::iter().filter(|rule| self.enabled(*rule))
    }
}

impl Default for RuleTable {
    /// Every rule is on by default.
    fn default() -> Self {
        Self::from_rules(Rule::iter())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::{Rule, RuleTable};

    #[test]
    fn names_are_unique_and_kebab_case() {
        let names: Vec<_> = Rule::iter().map(Rule::name).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        for name in names {
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '-'));
        }
    }

    #[test]
    fn round_trips_through_names() {
        for rule in Rule::iter() {
            assert_eq!(rule.name().parse::<Rule>(), Ok(rule));
        }
        assert!("no-such-rule".parse::<Rule>().is_err());
    }

    #[test]
    fn default_table_enables_everything() {
        let table = RuleTable::default();
        for rule in Rule::iter() {
            assert!(table.enabled(rule));
        }
    }

    #[test]
    fn disabling_a_rule() {
        let mut table = RuleTable::default();
        table.disable(Rule::LineTooLong);
        assert!(!table.enabled(Rule::LineTooLong));
        assert!(table.enabled(Rule::TrailingWhitespace));
    }
}
