use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a warning in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print the current release, with its tag when asked for.
pub fn display_current(version: &str, tag: Option<&str>) {
    match tag {
        Some(tag) => println!(
            "Current release is: {} (VCS tag: {})",
            style(version).green(),
            style(tag).green()
        ),
        None => println!("Current release is: {}", style(version).green()),
    }
}

/// Print the commit summaries made since `tag`, indented.
pub fn display_changes(tag: &str, changes: &[String]) {
    println!(
        "Here is the list of changes since {}:",
        style(tag).green()
    );

    if changes.is_empty() {
        println!("   (none)");
    }

    for change in changes {
        println!("   {}", change);
    }
}

/// Print the version transition of a release.
///
/// # Arguments
/// * `current` - Version released before, `None` on a first release
/// * `next` - Version being released
pub fn display_release_plan(current: Option<&str>, next: &str) {
    match current {
        Some(current) => {
            println!("\n{}", style("Release:").bold());
            println!("  From: {}", style(current).red());
            println!("  To:   {}", style(next).green());
        }
        None => {
            println!("\n{}", style("First release:").bold());
            println!("  Version: {}", style(next).green());
        }
    }
}
