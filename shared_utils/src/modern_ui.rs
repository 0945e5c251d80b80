//! Terminal presentation helpers
//!
//! Colored one-line notices, a banner and spinner glyphs.

use console::style;

/// Unicode symbols
pub mod symbols {
    pub const HOURGLASS: &str = "⌛️";
    pub const FOLDER: &str = "📁";
    pub const DOOR: &str = "🚪";
    pub const WAVE: &str = "👋";
    pub const WARNING: &str = "⚠️";
    pub const ERROR: &str = "❌";
    pub const SUCCESS: &str = "✅";
    pub const HINT: &str = "💡";
}

// ═══════════════════════════════════════════════════════════════
// Spinner glyphs
// ═══════════════════════════════════════════════════════════════

/// Plain ASCII bar, renders on every terminal.
pub const SPINNER_BAR: &[&str] = &["|", "/", "-", "\\"];

// ═══════════════════════════════════════════════════════════════
// Notices
// ═══════════════════════════════════════════════════════════════

pub fn print_success(msg: &str) {
    eprintln!("{}", style(format!("{} {}", symbols::SUCCESS, msg)).green().bold());
}

pub fn print_warning(msg: &str) {
    eprintln!("{}", style(format!("{}  {}", symbols::WARNING, msg)).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{}", style(format!("{} {}", symbols::ERROR, msg)).red().bold());
}

/// Banner used by interactive front ends.
pub fn print_banner(title: &str) {
    let rule = "═".repeat(60);
    println!();
    println!("{}", style(&rule).cyan());
    println!("{}", style(title).cyan().bold());
    println!("{}", style(&rule).cyan());
    println!();
}
