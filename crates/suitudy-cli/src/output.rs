//! Output formatting for CLI results.

use anyhow::Result;
use serde::Serialize;
use suitudy_sdk::Amount;

/// Print a value as JSON (pretty-printed).
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a key-value pair in human-readable format.
pub fn print_kv(key: &str, value: &str) {
    println!("  {key}: {value}");
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!("\n--- {title} ---");
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("Warning: {msg}");
}

/// Format a token amount with both units shown.
pub fn format_tokens(amount: Amount) -> String {
    format!("{} SUITUDY ({} base units)", amount.to_fixed(2), amount.base_units())
}
