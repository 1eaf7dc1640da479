use colored::Colorize;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").bold());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

// ---------------------------------------------------------------------------
// Status lines
// ---------------------------------------------------------------------------

pub fn heading(text: &str) {
    println!("{}", text.blue().bold());
}

pub fn section(text: &str) {
    println!("\n{}", text.cyan());
}

pub fn ok(text: &str) {
    println!("{} {}", "✅".green(), text.green());
}

pub fn fail(text: &str) {
    println!("{} {}", "❌".red(), text.red());
}

pub fn warn(text: &str) {
    println!("{} {}", "⚠️ ".yellow(), text.yellow());
}

pub fn hint(text: &str) {
    println!("{} {}", "💡".yellow(), text.yellow());
}

pub fn muted(text: &str) {
    println!("{}", text.dimmed());
}

/// Numbered `command   # comment` lines.
pub fn steps(items: &[(&str, &str)]) {
    let width = items.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);
    for (i, (cmd, note)) in items.iter().enumerate() {
        println!("  {}. {:width$}  {}", i + 1, cmd.bold(), format!("# {note}").dimmed());
    }
}

/// Unnumbered `command   # comment` lines.
pub fn listing(items: &[(&str, &str)]) {
    let width = items.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);
    for (cmd, note) in items {
        println!("  {:width$}  {}", cmd.white(), format!("# {note}").dimmed());
    }
}
