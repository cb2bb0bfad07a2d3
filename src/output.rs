//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! output, progress tracking, and formatted tables. The library reports
//! through [`ProgressReporter`]; [`ConsoleReporter`] is the terminal side.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::file_category::CategoryRegistry;
use crate::report::{FileStatus, Operation, ProgressEvent, ProgressReporter};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use arranger::output::OutputFormatter;
    /// OutputFormatter::success("Moved photo.png to images");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` files.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Creates a spinner for work whose length is not known up front.
    pub fn create_spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Prints a summary table of file counts per folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use arranger::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("documents".to_string(), 15);
    /// counts.insert("images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_folder_len = folder_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_folder_len
        );
    }

    /// Prints the category rules in resolution order.
    pub fn rules_table(registry: &CategoryRegistry) {
        Self::header("CATEGORY RULES (first match wins)");
        for (position, rule) in registry.rules().iter().enumerate() {
            println!(
                "{:>4}  {:<16} {}",
                position + 1,
                rule.extension,
                rule.category.cyan()
            );
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Prints progress events to the terminal behind a progress bar.
#[derive(Default)]
pub struct ConsoleReporter {
    bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, print: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(print),
            None => print(),
        }
    }

    fn finish_bar(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&mut self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::Started {
                operation, files, ..
            } => {
                self.finish_bar();
                OutputFormatter::info(&event.to_string());
                self.bar = Some(match operation {
                    Operation::Dedup => {
                        OutputFormatter::create_spinner(format!("Hashing {} files...", files))
                    }
                    _ => OutputFormatter::create_progress_bar(*files as u64),
                });
            }
            ProgressEvent::File(outcome) => {
                let line = outcome.to_string();
                self.print(|| match &outcome.status {
                    FileStatus::Moved { .. } | FileStatus::Deleted { .. } => {
                        OutputFormatter::success(&line)
                    }
                    FileStatus::WouldMove { .. } | FileStatus::WouldDelete { .. } => {
                        OutputFormatter::dry_run_notice(&line)
                    }
                    FileStatus::Untouched => OutputFormatter::plain(&format!("  {}", line)),
                    FileStatus::Vanished => OutputFormatter::warning(&line),
                    FileStatus::Failed { .. } => OutputFormatter::error(&line),
                });
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
            ProgressEvent::DuplicateGroupFound(_) => {
                let line = event.to_string();
                self.print(|| OutputFormatter::info(&line));
            }
            ProgressEvent::Finished { summary, .. } => {
                self.finish_bar();
                OutputFormatter::header(summary);
            }
        }
    }
}
