//! Keyword condition logic.
//!
//! # Responsibilities
//! - Match "any of these keywords" (OR)
//! - Match "all of these keywords" (AND)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Matchers operate on already-normalized text
//! - Keywords are normalized by the caller with the same mode
//! - Empty condition lists are rejected at compile time, not here

/// Trait for matching normalized text against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the text matches this condition.
    fn matches(&self, text: &str) -> bool;
}

/// Matches when at least one keyword occurs in the text.
#[derive(Debug, Clone)]
pub struct AnyKeyword {
    keywords: Vec<String>,
}

impl AnyKeyword {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl Matcher for AnyKeyword {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

/// Matches when every keyword occurs in the text.
#[derive(Debug, Clone)]
pub struct AllKeywords {
    keywords: Vec<String>,
}

impl AllKeywords {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl Matcher for AllKeywords {
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().all(|k| text.contains(k.as_str()))
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, text: &str) -> bool {
        self.matchers.iter().all(|m| m.matches(text))
    }
}
