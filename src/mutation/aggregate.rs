//! Outcome tallies and mutation score.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mutation::model::{MutantRecord, Outcome};
use crate::mutation::parse::{DumpFormat, ParsedDump};

/// Outcome counts for a group of mutants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: usize,
    pub killed: usize,
    pub survived: usize,
    pub incompetent: usize,
    pub timeout: usize,
    pub pending: usize,
    pub other: usize,
}

impl Tally {
    pub fn add(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Killed => self.killed += 1,
            Outcome::Survived => self.survived += 1,
            Outcome::Incompetent => self.incompetent += 1,
            Outcome::Timeout => self.timeout += 1,
            Outcome::Pending => self.pending += 1,
            Outcome::Other => self.other += 1,
        }
    }

    /// Mutants the tests noticed (timeouts count as detected).
    pub fn detected(&self) -> usize {
        self.killed + self.timeout
    }

    /// Mutants that entered the score denominator.
    pub fn scored(&self) -> usize {
        self.detected() + self.survived
    }

    /// Detected / scored, as a percentage. None when nothing was scored.
    pub fn score(&self) -> Option<f64> {
        match self.scored() {
            0 => None,
            n => Some(self.detected() as f64 * 100.0 / n as f64),
        }
    }
}

/// A mutant the tests did not catch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Survivor {
    pub module_path: String,
    pub operator_name: String,
    pub occurrence: Option<u64>,
    pub diff: Option<String>,
}

impl From<&MutantRecord> for Survivor {
    fn from(record: &MutantRecord) -> Self {
        Self {
            module_path: record.module_path.clone(),
            operator_name: record.operator_name.clone(),
            occurrence: record.occurrence,
            diff: record.diff.clone(),
        }
    }
}

/// Aggregated view of one dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationSummary {
    pub format: DumpFormat,
    pub totals: Tally,
    pub score: Option<f64>,
    pub by_module: BTreeMap<String, Tally>,
    pub by_operator: BTreeMap<String, Tally>,
    pub survivors: Vec<Survivor>,
    pub skipped: usize,
}

impl MutationSummary {
    /// True when the score reaches `min_score` percent. A dump with
    /// nothing scored never passes.
    pub fn meets(&self, min_score: f64) -> bool {
        self.score.is_some_and(|score| score >= min_score)
    }
}

/// Tally a parsed dump.
pub fn summarize(dump: &ParsedDump) -> MutationSummary {
    let mut totals = Tally::default();
    let mut by_module: BTreeMap<String, Tally> = BTreeMap::new();
    let mut by_operator: BTreeMap<String, Tally> = BTreeMap::new();
    let mut survivors = Vec::new();

    for record in &dump.records {
        let outcome = record.outcome();
        totals.add(outcome);
        by_module
            .entry(record.module_path.clone())
            .or_default()
            .add(outcome);
        by_operator
            .entry(record.operator_name.clone())
            .or_default()
            .add(outcome);
        if outcome == Outcome::Survived {
            survivors.push(Survivor::from(record));
        }
    }

    MutationSummary {
        format: dump.format,
        score: totals.score(),
        totals,
        by_module,
        by_operator,
        survivors,
        skipped: dump.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(module: &str, operator: &str, outcome: Option<&str>) -> MutantRecord {
        MutantRecord {
            module_path: module.into(),
            operator_name: operator.into(),
            test_outcome: outcome.map(Into::into),
            ..Default::default()
        }
    }

    fn dump(records: Vec<MutantRecord>) -> ParsedDump {
        ParsedDump {
            format: DumpFormat::FlatJson,
            records,
            skipped: 0,
        }
    }

    #[test]
    fn test_tallies_and_score() {
        let summary = summarize(&dump(vec![
            record("a.py", "op1", Some("killed")),
            record("a.py", "op2", Some("survived")),
            record("b.py", "op1", Some("killed")),
            record("b.py", "op1", Some("timeout")),
            record("b.py", "op2", Some("incompetent")),
            record("b.py", "op2", None),
        ]));

        assert_eq!(summary.totals.total, 6);
        assert_eq!(summary.totals.killed, 2);
        assert_eq!(summary.totals.pending, 1);
        // (2 killed + 1 timeout) / (3 detected + 1 survived)
        assert_eq!(summary.score, Some(75.0));
        assert_eq!(summary.by_module["a.py"].survived, 1);
        assert_eq!(summary.by_operator["op1"].detected(), 3);
        assert_eq!(summary.survivors.len(), 1);
        assert_eq!(summary.survivors[0].operator_name, "op2");
        assert!(summary.meets(75.0));
        assert!(!summary.meets(75.1));
    }

    #[test]
    fn test_nothing_scored() {
        let summary = summarize(&dump(vec![record("a.py", "op", Some("incompetent"))]));
        assert_eq!(summary.score, None);
        assert!(!summary.meets(0.0));
    }
}
