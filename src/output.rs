use colored::Colorize;

use crate::engine::Mode;

pub fn print_banner() {
    println!("{}", "nugetsweep - NuGet package cache cleanup".bold().cyan());
    println!();
}

pub fn print_run_header(root: &str, days: u64, mode: Mode) {
    let verb = match mode {
        Mode::Report => "Scanning",
        Mode::Remove => "Cleaning",
    };
    println!(
        "{} {} for versions unused for {}+ days",
        verb.bold().white(),
        root.dimmed(),
        days
    );
    println!();
}

pub fn print_target(path: &str, age: &str, size: &str) {
    println!("  {}  {}  {}", path.dimmed(), age, size.yellow());
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as report-only scan."
            .yellow()
            .bold()
    );
    println!();
}

pub fn print_canceled(count: usize, partial: &str) {
    println!();
    println!(
        "{} {}",
        "Canceled.".yellow().bold(),
        format!("{count} matches found before stopping ({partial}).").yellow()
    );
}

pub fn print_no_matches(days: u64) {
    println!();
    println!(
        "{}",
        format!("No matches discovered. Try lowering --days (currently {days}).").cyan()
    );
}

pub fn print_summary(mode: Mode, count: usize, total: &str) {
    println!();
    match mode {
        Mode::Report => println!(
            "  {} {}  {}",
            format!("{count} stale versions, reclaimable:").bold(),
            total.green().bold(),
            "[report only]".dimmed()
        ),
        Mode::Remove => println!(
            "{} {}",
            "Cleaned!".green().bold(),
            format!("{count} stale versions removed, {total} freed.").green()
        ),
    }
}

pub fn print_disk_line(available: &str) {
    println!("  {} {}", "Disk space now free:".bold(), available.green());
}

pub fn print_usage_header(root: &str) {
    println!("{} {}", "Package usage in".bold().white(), root.dimmed());
    println!();
}

pub fn print_usage_row(name: &str, versions: usize, size: &str) {
    let versions = if versions == 1 {
        "1 version".to_string()
    } else {
        format!("{versions} versions")
    };
    println!("  {:<40} {:<12} {}", name, versions, size.yellow());
}

pub fn print_usage_elided(hidden: usize) {
    println!("  {}", format!("... and {hidden} more").dimmed());
}

pub fn print_usage_total(packages: usize, total: &str) {
    println!("  {}", "─".repeat(60).dimmed());
    println!(
        "  {:<40} {:<12} {}",
        "Total:".bold(),
        format!("{packages} packages"),
        total.green().bold()
    );
}

pub fn print_no_packages(root: &str) {
    println!("{}", format!("No packages found under {root}.").cyan());
}
