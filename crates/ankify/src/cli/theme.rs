//! Custom dialoguer theme and banner for Ankify's interactive prompts.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` configured with Ankify's visual identity.
pub fn ankify_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Prints a one-line title to stderr, leaving stdout for data.
pub fn print_banner(title: &str) {
    let cyan = Style::new().for_stderr().cyan().bold();
    eprintln!();
    eprintln!("  {}", cyan.apply_to(format!("Ankify v{} · {title}", ankify_core::VERSION)));
    eprintln!();
}
