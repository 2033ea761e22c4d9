use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use nugetsweep::cli::{Cli, Command};
use nugetsweep::engine::{Mode, ScanEvent, ScanOptions};
use nugetsweep::session::ScanSession;
use nugetsweep::{analyzer, disk_info, logging, output, paths, utils};

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { days, path } => run_scan(days, path, Mode::Report),
        Command::Clean {
            confirm,
            days,
            path,
        } => {
            if confirm {
                run_scan(days, path, Mode::Remove)
            } else {
                output::print_no_confirm_warning();
                run_scan(days, path, Mode::Report)
            }
        }
        Command::Analyze { path, top } => run_analyze(path, top),
    }
}

fn cache_root(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => Ok(paths::global_packages_dir()?),
    }
}

fn run_scan(days: u64, path: Option<PathBuf>, mode: Mode) -> anyhow::Result<()> {
    let root = cache_root(path)?;
    output::print_banner();
    output::print_run_header(&utils::display_path(&root), days, mode);

    let session = ScanSession::spawn(ScanOptions {
        root: root.clone(),
        days,
        mode,
    });
    let cancel = session.cancel_flag();
    ctrlc::set_handler(move || cancel.cancel()).context("failed to install Ctrl-C handler")?;

    let mut matches = 0usize;
    let mut total_bytes = 0u64;
    for event in session.events() {
        match event {
            ScanEvent::TargetFound(target) => {
                matches += 1;
                output::print_target(
                    &utils::display_path(&target.path),
                    &utils::format_age(target.last_access),
                    &utils::format_size(target.size_bytes),
                );
            }
            ScanEvent::Error(err) => output::print_warning(&err.to_string()),
            ScanEvent::Complete { total_bytes: total } => total_bytes = total,
        }
    }
    let was_cancelled = session.is_cancelled();
    session.join();

    if was_cancelled {
        output::print_canceled(matches, &utils::format_size(total_bytes));
        return Ok(());
    }
    if matches == 0 {
        output::print_no_matches(days);
        return Ok(());
    }
    output::print_summary(mode, matches, &utils::format_size(total_bytes));
    if mode == Mode::Remove {
        if let Some(info) = disk_info::disk_info(&root) {
            output::print_disk_line(&utils::format_size(info.available));
        }
    }
    Ok(())
}

fn run_analyze(path: Option<PathBuf>, top: usize) -> anyhow::Result<()> {
    let root = cache_root(path)?;
    output::print_banner();

    let packages = analyzer::analyze_cache(&root, |done, total, name| {
        tracing::debug!(done, total, package = name, "measuring");
    });
    if packages.is_empty() {
        output::print_no_packages(&utils::display_path(&root));
        return Ok(());
    }

    let cache_total: u64 = packages.iter().map(|p| p.total_bytes).sum();
    output::print_usage_header(&utils::display_path(&root));
    for pkg in packages.iter().take(top) {
        output::print_usage_row(
            &pkg.name,
            pkg.versions.len(),
            &utils::format_size(pkg.total_bytes),
        );
    }
    if packages.len() > top {
        output::print_usage_elided(packages.len() - top);
    }
    output::print_usage_total(packages.len(), &utils::format_size(cache_total));
    Ok(())
}
