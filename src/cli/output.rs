//! Console formatting for yard's own listings

use console::style;

/// Renders a titled two-column listing, padding names to a common width
pub fn listing(title: &str, rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = format!("{}\n", style(title).bold());
    for (name, description) in rows {
        let padded = format!("{name:<width$}");
        out.push_str(&format!("  {}   {}\n", style(padded).cyan(), description));
    }
    out
}

/// Usage line followed by a blank line
pub fn usage(line: &str) -> String {
    format!("{} {}\n\n", style("Usage:").bold(), line)
}
