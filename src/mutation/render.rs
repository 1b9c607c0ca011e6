//! Markdown and JSON rendering of mutation summaries.

use std::collections::BTreeMap;

use crate::mutation::aggregate::{MutationSummary, Tally};

pub fn render_markdown(summary: &MutationSummary, min_score: Option<f64>) -> String {
    let mut out = String::new();

    let header = match min_score {
        Some(min) if summary.meets(min) => "## ✅ mutation testing: pass",
        Some(_) => "## ❌ mutation testing: fail",
        None => "## 🧬 mutation testing report",
    };
    out.push_str(header);
    out.push_str("\n\n");

    out.push_str(&format!("**Score:** {}", format_score(summary.score)));
    if let Some(min) = min_score {
        out.push_str(&format!(" (minimum {:.2}%)", min));
    }
    out.push_str("\n\n");
    out.push_str(&format!(
        "**Source:** {} ({} mutants",
        summary.format, summary.totals.total
    ));
    if summary.skipped > 0 {
        out.push_str(&format!(", {} unreadable entries skipped", summary.skipped));
    }
    out.push_str(")\n\n");

    out.push_str("| outcome | count |\n");
    out.push_str("|---|---:|\n");
    let t = &summary.totals;
    for (label, count) in [
        ("killed", t.killed),
        ("survived", t.survived),
        ("timeout", t.timeout),
        ("incompetent", t.incompetent),
        ("pending", t.pending),
        ("other", t.other),
    ] {
        out.push_str(&format!("| {} | {} |\n", label, count));
    }
    out.push_str(&format!("| **total** | **{}** |\n", t.total));

    push_breakdown(&mut out, "By module", "module", &summary.by_module);
    push_breakdown(&mut out, "By operator", "operator", &summary.by_operator);

    if !summary.survivors.is_empty() {
        out.push_str(&format!("\n### Surviving mutants ({})\n\n", summary.survivors.len()));
        for survivor in &summary.survivors {
            let occurrence = survivor
                .occurrence
                .map(|o| format!(" #{}", o))
                .unwrap_or_default();
            out.push_str(&format!(
                "<details><summary><code>{}</code> · <code>{}</code>{}</summary>\n\n",
                survivor.module_path, survivor.operator_name, occurrence
            ));
            match &survivor.diff {
                Some(diff) => {
                    out.push_str("```diff\n");
                    out.push_str(diff.trim_end());
                    out.push_str("\n```\n");
                }
                None => out.push_str("_no diff recorded_\n"),
            }
            out.push_str("\n</details>\n\n");
        }
    }

    out
}

fn push_breakdown(out: &mut String, title: &str, column: &str, groups: &BTreeMap<String, Tally>) {
    if groups.is_empty() {
        return;
    }
    out.push_str(&format!("\n### {}\n\n", title));
    out.push_str(&format!(
        "| {} | total | killed | survived | timeout | incompetent | score |\n",
        column
    ));
    out.push_str("|---|---:|---:|---:|---:|---:|---:|\n");
    for (name, tally) in groups {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} | {} |\n",
            name,
            tally.total,
            tally.killed,
            tally.survived,
            tally.timeout,
            tally.incompetent,
            format_score(tally.score()),
        ));
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.2}%", s),
        None => "n/a".to_string(),
    }
}

pub fn render_json(summary: &MutationSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
