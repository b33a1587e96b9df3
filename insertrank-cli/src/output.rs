/// Output formatting: terminal table, JSON, and live progress lines.
use insertrank_core::{remaining_comparisons_upper_bound, Comparison, Insertion, Item, RankingObserver};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    name: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: Vec<JsonRankedItem<'a>>,
    ranked: usize,
    total: usize,
    complete: bool,
    max_comparisons_remaining: usize,
}

/// Render the ranking as a table.
pub fn render_table(ranked: &[Item]) -> String {
    let rank_width = ranked.len().to_string().len().max(1);
    let name_width = ranked.iter().map(|s| s.chars().count()).max().unwrap_or(4).max(4);

    let mut out = format!("{:>rank_width$} | {:<name_width$}\n", "#", "Item");
    out.push_str(&format!("{}-|-{}\n", "-".repeat(rank_width), "-".repeat(name_width)));
    for (i, item) in ranked.iter().enumerate() {
        out.push_str(&format!("{:>rank_width$} | {}\n", i + 1, item));
    }
    out
}

/// Print results as a formatted terminal table.
pub fn print_table(ranked: &[Item], total: usize, max_remaining: usize) {
    print!("{}", render_table(ranked));
    if ranked.len() < total {
        println!(
            "\n{} of {} items ranked (at most {} more comparisons)",
            ranked.len(),
            total,
            max_remaining,
        );
    } else {
        println!("\n{} items ranked", ranked.len());
    }
}

pub fn render_json(ranked: &[Item], total: usize, max_remaining: usize) -> String {
    let items = ranked
        .iter()
        .enumerate()
        .map(|(i, name)| JsonRankedItem { rank: i + 1, name: name.as_str() })
        .collect();

    let output = JsonOutput {
        items,
        ranked: ranked.len(),
        total,
        complete: ranked.len() >= total,
        max_comparisons_remaining: max_remaining,
    };

    // Plain strings and integers only; serialization cannot fail.
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

/// Print results as JSON.
pub fn print_json(ranked: &[Item], total: usize, max_remaining: usize) {
    println!("{}", render_json(ranked, total, max_remaining));
}

/// Reports session progress on stderr and in the log.
pub struct ProgressReporter {
    ranked: usize,
    total: usize,
}

impl ProgressReporter {
    pub fn new(ranked: usize, total: usize) -> Self {
        ProgressReporter { ranked, total }
    }

    /// Items in the ranking as of the last save.
    pub fn ranked(&self) -> usize {
        self.ranked
    }
}

impl RankingObserver for ProgressReporter {
    fn on_comparison(&mut self, comparison: &Comparison) {
        debug!(
            incumbent = %comparison.incumbent,
            incumbent_rank = comparison.incumbent_rank,
            candidate = %comparison.candidate,
            candidate_index = comparison.candidate_index,
            "asking"
        );
    }

    fn on_inserted(&mut self, insertion: &Insertion, ranked: &[Item]) {
        self.ranked = insertion.ranked_len;
        let remaining = remaining_comparisons_upper_bound(insertion.ranked_len, self.total);
        info!(
            position = insertion.position,
            ranked = insertion.ranked_len,
            comparisons = insertion.comparisons,
            "inserted and saved"
        );
        eprintln!(
            "Placed \"{}\" at #{} ({}/{} ranked, at most {} comparisons left)",
            ranked[insertion.position],
            insertion.position + 1,
            insertion.ranked_len,
            self.total,
            remaining,
        );
    }

    fn on_ranking_complete(&mut self, ranked: &[Item]) {
        self.ranked = ranked.len();
        info!(items = ranked.len(), "ranking complete");
        eprintln!("\nRanking completed");
    }
}
