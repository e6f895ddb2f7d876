//! # Safety Assessment
//!
//! Tiered safety levels shared by all three domains and the ordered
//! recommendation rules that turn a computed result into advice text.
//!
//! A rule list is evaluated top to bottom and every rule whose predicate holds
//! contributes one message. Order is part of the contract: callers display the
//! messages in exactly the order returned.
//!
//! ```rust
//! use impact_core::assessment::{evaluate_rules, RecommendationRule};
//!
//! struct Check { ratio: f64 }
//!
//! let rules: &[RecommendationRule<Check>] = &[
//!     RecommendationRule::<Check>::new(|c| c.ratio > 1.0, |c| format!("Overstressed ({:.2})", c.ratio)),
//! ];
//! let messages = evaluate_rules(rules, &Check { ratio: 1.25 }, &["Proceed"]);
//! assert_eq!(messages, vec!["Overstressed (1.25)".to_string()]);
//! ```

use serde::{Deserialize, Serialize};

/// Safety tier of an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    /// Meets all requirements
    #[default]
    Safe,
    /// Requires special design or monitoring
    Warning,
    /// Requires redesign
    Danger,
}

impl SafetyLevel {
    /// All levels, least to most severe
    pub const ALL: [SafetyLevel; 3] = [SafetyLevel::Safe, SafetyLevel::Warning, SafetyLevel::Danger];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SafetyLevel::Safe => "Safe",
            SafetyLevel::Warning => "Warning",
            SafetyLevel::Danger => "Danger",
        }
    }

    /// Display colour used by report and chart collaborators
    pub fn color(&self) -> &'static str {
        match self {
            SafetyLevel::Safe => "green",
            SafetyLevel::Warning => "orange",
            SafetyLevel::Danger => "red",
        }
    }
}

impl std::fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A `(predicate, message)` pair over a domain context `C`.
pub struct RecommendationRule<C> {
    applies: fn(&C) -> bool,
    message: fn(&C) -> String,
}

impl<C> RecommendationRule<C> {
    pub const fn new(applies: fn(&C) -> bool, message: fn(&C) -> String) -> Self {
        Self { applies, message }
    }

    /// True when the rule fires for `context`
    pub fn applies(&self, context: &C) -> bool {
        (self.applies)(context)
    }
}

impl<C> Clone for RecommendationRule<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for RecommendationRule<C> {}

/// Evaluate `rules` in order, returning one message per rule that applies.
///
/// When no rule applies, `fallback` is returned instead.
pub fn evaluate_rules<C>(rules: &[RecommendationRule<C>], context: &C, fallback: &[&str]) -> Vec<String> {
    let messages: Vec<String> = rules
        .iter()
        .filter(|rule| (rule.applies)(context))
        .map(|rule| (rule.message)(context))
        .collect();
    if messages.is_empty() {
        fallback.iter().map(|m| m.to_string()).collect()
    } else {
        messages
    }
}

/// Evaluate `rules` in order without a fallback.
pub fn collect_rules<C>(rules: &[RecommendationRule<C>], context: &C) -> Vec<String> {
    evaluate_rules(rules, context, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flags {
        a: bool,
        b: bool,
    }

    fn rules() -> Vec<RecommendationRule<Flags>> {
        vec![
            RecommendationRule::<Flags>::new(|p| p.a, |_| "first".to_string()),
            RecommendationRule::<Flags>::new(|p| p.b, |_| "second".to_string()),
        ]
    }

    #[test]
    fn test_rule_order_preserved() {
        let out = evaluate_rules(&rules(), &Flags { a: true, b: true }, &["none"]);
        assert_eq!(out, vec!["first", "second"]);
    }

    #[test]
    fn test_fallback_when_nothing_fires() {
        let out = evaluate_rules(&rules(), &Flags { a: false, b: false }, &["none", "still none"]);
        assert_eq!(out, vec!["none", "still none"]);
        assert!(collect_rules(&rules(), &Flags { a: false, b: false }).is_empty());
    }

    #[test]
    fn test_level_ordering() {
        assert!(SafetyLevel::Danger > SafetyLevel::Warning);
        assert!(SafetyLevel::Warning > SafetyLevel::Safe);
        assert!(SafetyLevel::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(SafetyLevel::Warning.color(), "orange");
        assert_eq!(serde_json::to_string(&SafetyLevel::Danger).unwrap(), "\"danger\"");
    }
}
