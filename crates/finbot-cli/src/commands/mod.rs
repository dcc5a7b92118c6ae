//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared setup (config resolution) and `categorize`
//! - `analyze` - Full pipeline run and advisory report
//! - `reports` - Focused views: summary, anomalies, forecast

pub mod analyze;
pub mod core;
pub mod reports;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Section header used by the table views
pub fn print_section(title: &str) {
    println!();
    println!("{}", "─".repeat(55));
    println!("  {}", title);
    println!("{}", "─".repeat(55));
}
