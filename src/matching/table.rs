//! Ordered keyword tables.
//!
//! # Responsibilities
//! - Store compiled rules in declaration order
//! - Look up the first rule matching a question
//! - Return the matched payload or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(rules × keywords) scan, fine for catalog sizes
//! - Explicit None rather than a silent default; callers own the fallback

use serde::{Deserialize, Serialize};

use crate::matching::matcher::{AllKeywords, AndMatcher, AnyKeyword, Matcher};
use crate::matching::normalize::Normalization;

/// A keyword rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeywordRule<T> {
    /// At least one of these must occur.
    #[serde(default)]
    pub any_of: Vec<String>,

    /// Every one of these must occur.
    #[serde(default)]
    pub all_of: Vec<String>,

    /// Value returned when the rule matches.
    #[serde(alias = "response", alias = "target")]
    pub value: T,
}

impl<T> KeywordRule<T> {
    pub fn any(keywords: &[&str], value: T) -> Self {
        Self {
            any_of: keywords.iter().map(|k| k.to_string()).collect(),
            all_of: Vec::new(),
            value,
        }
    }

    pub fn all(keywords: &[&str], value: T) -> Self {
        Self {
            any_of: Vec::new(),
            all_of: keywords.iter().map(|k| k.to_string()).collect(),
            value,
        }
    }

    /// A rule with no keywords would match everything.
    pub fn is_empty(&self) -> bool {
        self.any_of.is_empty() && self.all_of.is_empty()
    }
}

#[derive(Debug)]
struct CompiledRule<T> {
    matcher: AndMatcher,
    value: T,
}

/// Immutable first-match keyword table.
#[derive(Debug)]
pub struct KeywordTable<T> {
    normalization: Normalization,
    rules: Vec<CompiledRule<T>>,
}

impl<T> KeywordTable<T> {
    /// Compile rules, normalizing keywords with `normalization`.
    ///
    /// Empty rules are skipped; validation reports them before this point.
    pub fn compile(normalization: Normalization, rules: Vec<KeywordRule<T>>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|rule| !rule.is_empty())
            .map(|rule| {
                let mut matchers: Vec<Box<dyn Matcher>> = Vec::with_capacity(2);
                if !rule.any_of.is_empty() {
                    matchers.push(Box::new(AnyKeyword::new(normalize_all(
                        normalization,
                        &rule.any_of,
                    ))));
                }
                if !rule.all_of.is_empty() {
                    matchers.push(Box::new(AllKeywords::new(normalize_all(
                        normalization,
                        &rule.all_of,
                    ))));
                }
                CompiledRule {
                    matcher: AndMatcher::new(matchers),
                    value: rule.value,
                }
            })
            .collect();

        Self {
            normalization,
            rules,
        }
    }

    /// Normalization mode used by this table.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Normalize raw text the way this table expects.
    pub fn normalize(&self, text: &str) -> String {
        self.normalization.apply(text)
    }

    /// Find the first rule matching raw (unnormalized) text.
    pub fn lookup(&self, text: &str) -> Option<&T> {
        self.lookup_normalized(&self.normalize(text))
    }

    /// Find the first rule matching text already normalized with this table's mode.
    pub fn lookup_normalized(&self, normalized: &str) -> Option<&T> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(normalized))
            .map(|rule| &rule.value)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn normalize_all(normalization: Normalization, keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| normalization.apply(k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let table = KeywordTable::compile(
            Normalization::Lowercase,
            vec![
                KeywordRule::any(&["tarjeta"], 1),
                KeywordRule::any(&["límite", "tarjeta"], 2),
            ],
        );
        assert_eq!(table.lookup("Límite de la TARJETA"), Some(&1));
        assert_eq!(table.lookup("mi límite"), Some(&2));
        assert_eq!(table.lookup("nada"), None);
    }

    #[test]
    fn test_keywords_are_normalized_too() {
        let table = KeywordTable::compile(
            Normalization::Fold,
            vec![KeywordRule::any(&["Comisión"], "fee")],
        );
        assert_eq!(table.lookup("¿Qué comision tiene?"), Some(&"fee"));
        assert_eq!(table.lookup("¿Qué COMISIÓN tiene?"), Some(&"fee"));
    }

    #[test]
    fn test_any_and_all_combined() {
        let rule = KeywordRule {
            any_of: vec!["cambiar".into(), "convertir".into()],
            all_of: vec!["cuenta".into()],
            value: "switch",
        };
        let table = KeywordTable::compile(Normalization::Lowercase, vec![rule]);
        assert_eq!(table.lookup("cambiar de cuenta"), Some(&"switch"));
        assert_eq!(table.lookup("cambiar de banco"), None);
    }

    #[test]
    fn test_empty_rules_are_dropped() {
        let table = KeywordTable::compile(
            Normalization::Lowercase,
            vec![
                KeywordRule {
                    any_of: vec![],
                    all_of: vec![],
                    value: 0,
                },
                KeywordRule::any(&["x"], 1),
            ],
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("abc"), None);
    }
}
