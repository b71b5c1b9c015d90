// src/client/render.rs

use std::fmt::Write;

use crate::models::{
    question::PublicQuestion,
    submission::{ScoresResponse, SubmissionRecord},
};

/// Question with numbered options; the selected one is marked `[x]`.
/// Numbers shown to the participant are 1-based.
pub fn question(position: usize, q: &PublicQuestion, selected: Option<usize>) -> String {
    let mut out = format!("{}. {}\n", position + 1, q.question);
    for (i, option) in q.options.iter().enumerate() {
        let mark = if selected == Some(i) { "x" } else { " " };
        let _ = writeln!(out, "   [{}] {}) {}", mark, i + 1, option);
    }
    out
}

pub fn result(record: &SubmissionRecord) -> String {
    let mut out = format!("Score: {} / {}\n", record.score, record.total);
    let _ = writeln!(out, "Record ID: {}", record.id);

    for (i, detail) in record.details.iter().enumerate() {
        let verdict = if detail.is_correct { "correct" } else { "wrong" };
        let chosen = detail
            .chosen
            .map_or_else(|| "-".to_string(), |c| (c + 1).to_string());
        let _ = writeln!(
            out,
            "  Q{}: {} (chose {}, answer {})",
            i + 1,
            verdict,
            chosen,
            detail.correct + 1
        );
    }
    out
}

/// Admin score table, one row per submission, in the order given.
pub fn scores_table(scores: &ScoresResponse) -> String {
    let items = scores.items();
    if items.is_empty() {
        return format!("No submissions ({} total).\n", scores.total());
    }

    let header = ["Submitted", "Name", "Email", "Score"];
    let rows: Vec<[String; 4]> = items
        .iter()
        .map(|r| {
            [
                r.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.name.clone(),
                r.email.clone(),
                format!("{}/{}", r.score, r.total),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    let _ = writeln!(out, "Showing {} of {} submissions", items.len(), scores.total());
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
