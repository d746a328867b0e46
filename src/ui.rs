//! Terminal status output helpers

use console::Style;

/// Print the tool banner
pub fn banner(title: &str) {
    println!("{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("=".repeat(title.len())));
}

/// Print a stage heading
pub fn stage(text: &str) {
    println!("\n{}", Style::new().bold().apply_to(text));
}

/// Print a success line
pub fn ok(text: &str) {
    println!("{} {}", Style::new().green().apply_to("ok"), text);
}

/// Print a warning line for a soft failure or skipped action
pub fn warn(text: &str) {
    println!("{} {}", Style::new().yellow().bold().apply_to("warning:"), text);
}

/// Print captured child output, indented and dimmed
pub fn child_output(text: &str) {
    let dim = Style::new().dim();
    for line in text.trim_end().lines() {
        println!("  {}", dim.apply_to(line));
    }
}
