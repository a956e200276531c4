use std::collections::HashMap;
use std::io::{self, Write};

use molprop::dataset::DataSource;
use molprop::train::TrainReport;
use molprop::{MolecularGraph, Molecule};

use crate::util::text::{thousands, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_graph_summary(mol: &Molecule, graph: &MolecularGraph, strict: bool) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let aromatic = mol.atoms().iter().filter(|a| a.aromatic).count();
    let ring_bonds = mol.bonds().iter().filter(|b| b.in_ring).count();
    let rows = vec![
        ("Heavy Atoms", graph.node_count().to_string()),
        ("Bonds", mol.bond_count().to_string()),
        ("Ring Bonds", ring_bonds.to_string()),
        ("Aromatic Atoms", aromatic.to_string()),
        ("Directed Edges", graph.edge_count().to_string()),
        (
            "Adjacency",
            if strict { "all bonds" } else { "first partner" }.to_string(),
        ),
    ];

    print_kv_table(&mut out, "Graph Summary", &rows);
}

pub fn print_element_distribution(mol: &Molecule) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for atom in mol.atoms() {
        *counts.entry(atom.element.symbol()).or_insert(0) += 1;
    }

    let total = mol.atom_count();
    let mut sorted: Vec<_> = counts
        .into_iter()
        .map(|(symbol, c)| (symbol.to_string(), c))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_distribution_table(&mut out, "Element Distribution", &sorted, total);
}

pub fn print_dataset_info(source: &DataSource, size: usize, targets: &[String]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let kind = match source {
        DataSource::Table { .. } => "table",
        DataSource::Archive { .. } => "archive",
    };
    let rows = vec![
        ("Source", kind.to_string()),
        ("Path", source.path().display().to_string()),
        ("Samples", thousands(size)),
        ("Targets", targets.join(", ")),
    ];

    print_kv_table(&mut out, "Dataset Summary", &rows);
}

pub fn print_scan_summary(samples: usize, batches: usize, failures: &[(usize, String)]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows = vec![
        ("Loaded Samples", thousands(samples)),
        ("Batches", thousands(batches)),
        ("Failed Samples", failures.len().to_string()),
    ];
    print_kv_table(&mut out, "Scan Summary", &rows);

    if failures.is_empty() {
        return;
    }

    let pos_w = 8usize;
    let sep_overhead = 5;
    let msg_w = SAFE_TABLE_WIDTH.saturating_sub(pos_w + sep_overhead);

    let _ = writeln!(out, "{}┌─ Failures ─┐", INDENT);
    let _ = writeln!(
        out,
        "{}┌{p_line}┬{m_line}┐",
        INDENT,
        p_line = "─".repeat(pos_w + 2),
        m_line = "─".repeat(msg_w + 2)
    );
    for (position, message) in failures.iter().take(15) {
        let _ = writeln!(
            out,
            "{}│ {:>pos_w$} │ {:<msg_w$} │",
            INDENT,
            position,
            truncate(message, msg_w),
            pos_w = pos_w,
            msg_w = msg_w
        );
    }
    if failures.len() > 15 {
        let _ = writeln!(
            out,
            "{}│ {:>pos_w$} │ {:<msg_w$} │",
            INDENT,
            "...",
            format!("({} more failures)", failures.len() - 15),
            pos_w = pos_w,
            msg_w = msg_w
        );
    }
    let _ = writeln!(
        out,
        "{}└{p_line}┴{m_line}┘",
        INDENT,
        p_line = "─".repeat(pos_w + 2),
        m_line = "─".repeat(msg_w + 2)
    );
}

pub fn print_training_summary(report: &TrainReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let metric = |m: Option<f64>| m.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
    let rows = vec![
        ("Experiment", report.experiment_id.clone()),
        ("Train / Val", format!("{} / {}", report.train_size, report.val_size)),
        ("Steps", report.global_steps.to_string()),
        ("Skipped", report.skipped.to_string()),
        ("Train Loss", metric(report.last_train.map(|m| m.loss))),
        ("Train R²", metric(report.last_train.map(|m| m.r2))),
        ("Val Loss", metric(report.last_val.map(|m| m.loss))),
        ("Val R²", metric(report.last_val.map(|m| m.r2))),
        ("Scalars", report.scalar_export.display().to_string()),
        ("Checkpoint", report.checkpoint.display().to_string()),
    ];

    print_kv_table(&mut out, "Training Summary", &rows);
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{name_line}┬{count_line}┬{dist_line}┐",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT,
        "Element",
        "Count",
        "Distribution",
        name_w = name_w,
        count_w = count_w,
        dist_w = dist_w
    );
    let _ = writeln!(
        out,
        "{}├{name_line}┼{count_line}┼{dist_line}┤",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );

    for (name, count) in data {
        let pct = if total == 0 {
            0.0
        } else {
            (*count as f64 / total as f64) * 100.0
        };
        let bar = make_bar(pct, max_bar_width);
        let dist_cell = format!("{}  {:>5.1}%", bar, pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count,
            dist_cell,
            name_w = name_w,
            count_w = count_w,
            dist_w = dist_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{name_line}┴{count_line}┴{dist_line}┘",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT,
        "Metric",
        "Value",
        key_w = key_w,
        val_w = val_w
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate_left(val, val_w),
            key_w = key_w,
            val_w = val_w
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

// Paths keep their most specific end.
fn truncate_left(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len || max_len == 0 {
        return truncate(s, max_len);
    }
    let tail: String = s.chars().skip(len - (max_len - 1)).collect();
    format!("…{tail}")
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_truncation_keeps_the_tail() {
        assert_eq!(truncate_left("results/run_1_all_scalars.json", 12), "…calars.json");
        assert_eq!(truncate_left("short", 12), "short");
    }

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(make_bar(50.0, 10).chars().count(), 10);
        assert_eq!(make_bar(100.0, 4), "████");
    }
}
