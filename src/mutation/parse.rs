//! Mutation dump parsing.
//!
//! Accepted shapes:
//! - flat JSON: `[{"module_path": .., "operator_name": .., "test_outcome": ..}, ..]`
//! - paired-list JSON: `[[work_item, work_result], ..]`, `work_result` may be null
//! - NDJSON: one flat record or pair per line
//! - any of the array shapes wrapped as `{"mutants": [..]}` or `{"results": [..]}`

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::mutation::model::{MutantRecord, UNKNOWN};

/// Shape a dump was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpFormat {
    FlatJson,
    PairedJson,
    Ndjson,
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DumpFormat::FlatJson => "flat JSON",
            DumpFormat::PairedJson => "paired-list JSON",
            DumpFormat::Ndjson => "NDJSON",
        })
    }
}

/// Records extracted from one dump.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDump {
    pub format: DumpFormat,
    pub records: Vec<MutantRecord>,
    /// NDJSON lines or array entries that could not be read.
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read dump: {0}")]
    Io(#[from] std::io::Error),
    #[error("dump is empty")]
    Empty,
    #[error("no mutant records found ({skipped} unreadable entries)")]
    NoRecords { skipped: usize },
}

/// Read and parse a dump file.
pub fn parse_file(path: &Path) -> Result<ParsedDump, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_dump(&text)
}

/// Parse dump text, detecting its shape.
pub fn parse_dump(text: &str) -> Result<ParsedDump, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let parsed = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => match unwrap_array(value) {
            // One-mutant NDJSON: the only line is a `[work_item, work_result]` pair.
            Ok(items) if is_single_pair(&items) => {
                from_values(DumpFormat::Ndjson, vec![Value::Array(items)])
            }
            Ok(items) => from_array(items),
            // A single record object is a one-line NDJSON dump.
            Err(single) => from_values(DumpFormat::Ndjson, vec![single]),
        },
        Err(_) => from_lines(trimmed),
    };

    if parsed.records.is_empty() {
        return Err(ParseError::NoRecords {
            skipped: parsed.skipped,
        });
    }
    Ok(parsed)
}

fn unwrap_array(value: Value) -> Result<Vec<Value>, Value> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ["mutants", "results"] {
                if map.get(key).is_some_and(Value::is_array) {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return Ok(items);
                    }
                }
            }
            Err(Value::Object(map))
        }
        other => Err(other),
    }
}

/// True when `items` is a work item followed by its result (or `null`),
/// rather than two flat records.
fn is_single_pair(items: &[Value]) -> bool {
    let [item, result] = items else {
        return false;
    };
    let Some(item) = item.as_object() else {
        return false;
    };
    let item_is_work_item = item.contains_key("mutations") || item.contains_key("job_id");
    match result {
        Value::Null => item_is_work_item,
        Value::Object(result) => {
            let result_only = (result.contains_key("test_outcome")
                || result.contains_key("worker_outcome"))
                && !result.contains_key("module_path");
            item_is_work_item || result_only
        }
        _ => false,
    }
}

fn from_array(items: Vec<Value>) -> ParsedDump {
    let format = if items.first().is_some_and(Value::is_array) {
        DumpFormat::PairedJson
    } else {
        DumpFormat::FlatJson
    };
    from_values(format, items)
}

fn from_values(format: DumpFormat, items: Vec<Value>) -> ParsedDump {
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.iter().enumerate() {
        match record_from_value(item) {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(index, "Skipping unrecognized dump entry");
                skipped += 1;
            }
        }
    }
    ParsedDump {
        format,
        records,
        skipped,
    }
}

fn from_lines(text: &str) -> ParsedDump {
    let mut records = Vec::new();
    let mut skipped = 0;
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<Value>(line)
            .ok()
            .and_then(|value| record_from_value(&value));
        match record {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(line = number + 1, "Skipping unreadable NDJSON line");
                skipped += 1;
            }
        }
    }
    ParsedDump {
        format: DumpFormat::Ndjson,
        records,
        skipped,
    }
}

/// Extract a record from a flat object, a `[item, result]` pair, or a
/// `{"work_item": .., "work_result": ..}` object.
fn record_from_value(value: &Value) -> Option<MutantRecord> {
    match value {
        Value::Array(pair) if pair.len() == 2 => {
            let item = pair[0].as_object()?;
            Some(from_pair(item, &pair[1]))
        }
        Value::Object(map) => {
            if let Some(Value::Object(item)) = map.get("work_item") {
                let result = map
                    .get("work_result")
                    .or_else(|| map.get("result"))
                    .unwrap_or(&Value::Null);
                return Some(from_pair(item, result));
            }
            Some(from_flat(map))
        }
        _ => None,
    }
}

fn from_flat(map: &Map<String, Value>) -> MutantRecord {
    let mut record = MutantRecord::default();
    fill_location(&mut record, map);
    fill_result(&mut record, map);
    record
}

fn from_pair(item: &Map<String, Value>, result: &Value) -> MutantRecord {
    let mut record = MutantRecord::default();
    fill_location(&mut record, item);
    if let Value::Object(result) = result {
        fill_result(&mut record, result);
    }
    record
}

fn fill_location(record: &mut MutantRecord, map: &Map<String, Value>) {
    // Newer dumps nest the location under "mutations".
    let source = match map.get("mutations") {
        Some(Value::Array(mutations)) => mutations.first().and_then(Value::as_object).unwrap_or(map),
        _ => map,
    };

    record.module_path =
        text_field(source, &["module_path", "module"]).unwrap_or_else(|| UNKNOWN.to_string());
    record.operator_name =
        text_field(source, &["operator_name", "operator"]).unwrap_or_else(|| UNKNOWN.to_string());
    record.occurrence = source.get("occurrence").and_then(Value::as_u64);
}

fn fill_result(record: &mut MutantRecord, map: &Map<String, Value>) {
    record.test_outcome = text_field(map, &["test_outcome", "outcome"]);
    record.worker_outcome = text_field(map, &["worker_outcome"]);
    record.output = text_field(map, &["output"]);
    record.diff = text_field(map, &["diff"]);
}

/// First present, non-null field among `keys`, rendered as text.
///
/// Arrays of strings (diffs split into lines) are joined with newlines.
fn text_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let value = keys
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())?;

    Some(match value {
        Value::String(s) => s.clone(),
        Value::Array(lines) if lines.iter().all(Value::is_string) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::model::Outcome;

    #[test]
    fn test_flat_json() {
        let dump = parse_dump(
            r#"[
                {"module_path": "app/main.py", "operator_name": "core/NumberReplacer",
                 "occurrence": 2, "test_outcome": "killed", "output": "F", "diff": "-1\n+2"},
                {"module_path": "app/main.py", "operator_name": "core/ReplaceTrueWithFalse",
                 "test_outcome": "survived"}
            ]"#,
        )
        .unwrap();

        assert_eq!(dump.format, DumpFormat::FlatJson);
        assert_eq!(dump.records.len(), 2);
        assert_eq!(dump.records[0].occurrence, Some(2));
        assert_eq!(dump.records[0].diff.as_deref(), Some("-1\n+2"));
        assert_eq!(dump.records[1].outcome(), Outcome::Survived);
    }

    #[test]
    fn test_paired_json_with_nested_mutations_and_pending() {
        let dump = parse_dump(
            r#"[
                [{"job_id": "a", "mutations": [{"module_path": "svc.py", "operator_name": "op/A", "occurrence": 0}]},
                 {"worker_outcome": "normal", "test_outcome": "killed", "output": "", "diff": ["--- a", "+++ b"]}],
                [{"job_id": "b", "module_path": "svc.py", "operator_name": "op/B"}, null]
            ]"#,
        )
        .unwrap();

        assert_eq!(dump.format, DumpFormat::PairedJson);
        assert_eq!(dump.records[0].module_path, "svc.py");
        assert_eq!(dump.records[0].operator_name, "op/A");
        assert_eq!(dump.records[0].diff.as_deref(), Some("--- a\n+++ b"));
        assert_eq!(dump.records[0].outcome(), Outcome::Killed);
        assert_eq!(dump.records[1].outcome(), Outcome::Pending);
    }

    #[test]
    fn test_ndjson_skips_bad_lines() {
        let text = concat!(
            r#"[{"module_path": "a.py", "operator_name": "x"}, {"test_outcome": "survived"}]"#,
            "\n\n",
            "not json at all\n",
            r#"{"module_path": "b.py", "operator_name": "y", "test_outcome": "incompetent"}"#,
            "\n",
        );
        let dump = parse_dump(text).unwrap();

        assert_eq!(dump.format, DumpFormat::Ndjson);
        assert_eq!(dump.records.len(), 2);
        assert_eq!(dump.skipped, 1);
        assert_eq!(dump.records[0].outcome(), Outcome::Survived);
        assert_eq!(dump.records[1].outcome(), Outcome::Incompetent);
    }

    #[test]
    fn test_single_pair_line_is_one_mutant() {
        let dump = parse_dump(concat!(
            r#"[{"job_id": "a", "mutations": [{"module_path": "svc.py", "operator_name": "op/A"}]},"#,
            r#" {"worker_outcome": "normal", "test_outcome": "survived", "output": "", "diff": "-a\n+b"}]"#,
            "\n",
        ))
        .unwrap();

        assert_eq!(dump.format, DumpFormat::Ndjson);
        assert_eq!(dump.records.len(), 1);
        assert_eq!(dump.records[0].module_path, "svc.py");
        assert_eq!(dump.records[0].operator_name, "op/A");
        assert_eq!(dump.records[0].outcome(), Outcome::Survived);
    }

    #[test]
    fn test_single_pending_pair() {
        let dump = parse_dump(r#"[{"job_id": "a", "module_path": "svc.py", "operator_name": "op/A"}, null]"#)
            .unwrap();
        assert_eq!(dump.records.len(), 1);
        assert_eq!(dump.records[0].outcome(), Outcome::Pending);
    }

    #[test]
    fn test_two_flat_records_stay_flat() {
        let dump = parse_dump(
            r#"[{"module_path": "a.py", "operator_name": "x", "test_outcome": "killed"},
                {"module_path": "b.py", "operator_name": "y", "test_outcome": "survived"}]"#,
        )
        .unwrap();
        assert_eq!(dump.format, DumpFormat::FlatJson);
        assert_eq!(dump.records.len(), 2);
    }

    #[test]
    fn test_wrapped_array() {
        let dump = parse_dump(r#"{"mutants": [{"test_outcome": "killed"}]}"#).unwrap();
        assert_eq!(dump.format, DumpFormat::FlatJson);
        assert_eq!(dump.records[0].module_path, UNKNOWN);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(matches!(parse_dump("  \n"), Err(ParseError::Empty)));
        assert!(matches!(
            parse_dump("garbage\nmore garbage"),
            Err(ParseError::NoRecords { skipped: 2 })
        ));
    }
}
