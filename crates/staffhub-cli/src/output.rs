//! Table, JSON, and notification-style output for CLI commands.

use std::io::Write;

use serde::Serialize;
use tabled::{Table, Tabled};

use staffhub_core::types::pagination::PageResponse;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print one page of items, with a page footer in table mode
pub fn print_page<T: Serialize + Tabled>(page: &PageResponse<T>, format: OutputFormat) {
    print_list(&page.items, format);
    if matches!(format, OutputFormat::Table) && page.total_pages > 1 {
        println!(
            "Page {} of {} ({} total)",
            page.page, page.total_pages, page.total_items
        );
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success notification
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning notification
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error notification
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

/// Redraw the in-place upload progress line
pub fn print_progress(label: &str, percent: u8) {
    print!("\r{}... {:3}%", label, percent);
    let _ = std::io::stdout().flush();
}

/// Terminate the in-place progress line
pub fn finish_progress() {
    println!();
}
