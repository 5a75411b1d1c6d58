//! Terminal presentation: run a summary, record it, render history.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::gateway::Summarizer;
use crate::history::{HistoryEntry, HistoryStore};
use crate::summary::SummaryRequest;

pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all summary history?";

/// Summarize and, only on success, record the result in local history.
pub async fn summarize_and_record(
    summarizer: &dyn Summarizer,
    history: &HistoryStore,
    request: &SummaryRequest,
) -> Result<HistoryEntry> {
    let result = summarizer
        .summarize(request)
        .await
        .map_err(|e| anyhow!("{}", e))?;

    history.record(result).await
}

pub fn render_entry(entry: &HistoryEntry) -> String {
    let r = &entry.result;
    format!(
        "{summary}\n\n[{length} | {kind}] {orig} words -> {sum} words\nsource: {input}\nid: {id}  created: {created}",
        summary = r.summary,
        length = r.summary_length,
        kind = r.input_type,
        orig = r.word_count_original,
        sum = r.word_count_summary,
        input = r.input_text,
        id = entry.id,
        created = entry.created_date.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

pub fn render_list(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No summaries yet".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{}  {}  {:<8} {}",
                e.id,
                e.created_date.format("%Y-%m-%d %H:%M"),
                e.result.summary_length,
                preview(&e.result.input_text, 60)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Ask a yes/no question; anything but y/yes is a no.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> bool {
    if write!(output, "{} [y/N] ", question).and_then(|_| output.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            warn!("cli: failed to read confirmation: {}", e);
            false
        }
    }
}
