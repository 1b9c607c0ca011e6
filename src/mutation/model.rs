//! Mutant records and their outcomes.

use serde::{Deserialize, Serialize};

/// Placeholder for missing module or operator names.
pub const UNKNOWN: &str = "<unknown>";

/// Classified result of one mutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Tests failed: the mutant was detected.
    Killed,
    /// Tests passed: the mutant went unnoticed.
    Survived,
    /// The mutant could not be tested (e.g. import error).
    Incompetent,
    /// Tests hung; counted as detected.
    Timeout,
    /// Not executed yet.
    Pending,
    /// Unrecognized outcome string.
    Other,
}

impl Outcome {
    /// Classify from the raw `test_outcome` / `worker_outcome` strings.
    pub fn classify(test_outcome: Option<&str>, worker_outcome: Option<&str>) -> Self {
        match worker_outcome.map(|w| w.trim().to_lowercase()).as_deref() {
            Some("timeout") => return Outcome::Timeout,
            Some("skipped") => return Outcome::Pending,
            _ => {}
        }

        match test_outcome.map(|t| t.trim().to_lowercase()).as_deref() {
            None | Some("") => Outcome::Pending,
            Some("killed") => Outcome::Killed,
            Some("survived") => Outcome::Survived,
            Some("incompetent") => Outcome::Incompetent,
            Some("timeout") => Outcome::Timeout,
            Some(_) => Outcome::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Killed => "killed",
            Outcome::Survived => "survived",
            Outcome::Incompetent => "incompetent",
            Outcome::Timeout => "timeout",
            Outcome::Pending => "pending",
            Outcome::Other => "other",
        }
    }
}

/// One mutant as found in a dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutantRecord {
    pub module_path: String,
    pub operator_name: String,
    pub occurrence: Option<u64>,
    pub test_outcome: Option<String>,
    pub worker_outcome: Option<String>,
    pub output: Option<String>,
    pub diff: Option<String>,
}

impl MutantRecord {
    pub fn outcome(&self) -> Outcome {
        Outcome::classify(self.test_outcome.as_deref(), self.worker_outcome.as_deref())
    }
}

impl Default for MutantRecord {
    fn default() -> Self {
        Self {
            module_path: UNKNOWN.to_string(),
            operator_name: UNKNOWN.to_string(),
            occurrence: None,
            test_outcome: None,
            worker_outcome: None,
            output: None,
            diff: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Outcome::classify(Some("killed"), Some("normal")), Outcome::Killed);
        assert_eq!(Outcome::classify(Some("SURVIVED"), None), Outcome::Survived);
        assert_eq!(Outcome::classify(Some("incompetent"), None), Outcome::Incompetent);
        assert_eq!(Outcome::classify(Some("killed"), Some("timeout")), Outcome::Timeout);
        assert_eq!(Outcome::classify(None, Some("skipped")), Outcome::Pending);
        assert_eq!(Outcome::classify(None, None), Outcome::Pending);
        assert_eq!(Outcome::classify(Some("weird"), None), Outcome::Other);
    }
}
