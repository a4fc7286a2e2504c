//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a stored journal entry summary.
    pub fn entry(id: &str, timestamp: &str, preview: &str) {
        println!(
            "  {} {} {}\n    {}",
            style("*").cyan(),
            style(timestamp).bold(),
            style(id).dim(),
            preview
        );
    }

    /// Print a retrieved entry with its distance.
    pub fn retrieved(position: usize, distance: f32, preview: &str) {
        println!(
            "\n{} entry #{} (distance: {:.3})\n   {}",
            style(">>").green(),
            position,
            distance,
            preview
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Shorten text to a single-line preview.
pub fn preview(text: &str, max_chars: usize) -> String {
    let line = text.replace('\n', " ");
    if line.chars().count() <= max_chars {
        line
    } else {
        let truncated: String = line.chars().take(max_chars).collect();
        format!("{}...", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncation() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("a longer piece of text", 8), "a longer...");
        assert_eq!(preview("line\nbreak", 20), "line break");
    }
}
