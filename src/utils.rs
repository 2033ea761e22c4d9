use std::path::Path;
use std::time::SystemTime;

use walkdir::WalkDir;

/// Compute total size of a directory recursively, ignoring unreadable
/// entries. The scan engine uses its own error-reporting variant; this
/// one is for overview displays where a best-effort number is fine.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Whole days elapsed since `stamp`, zero for timestamps in the future.
pub fn age_in_days(stamp: SystemTime) -> u64 {
    SystemTime::now()
        .duration_since(stamp)
        .map(|d| d.as_secs() / 86_400)
        .unwrap_or(0)
}

/// Format an age for display ("today", "1 day", "41 days").
pub fn format_age(stamp: SystemTime) -> String {
    match age_in_days(stamp) {
        0 => "today".to_string(),
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    }
}

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Shorten a path for display by replacing home dir with ~.
pub fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(relative) => format!("~/{}", relative.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn dir_size_counts_nested_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), [0u8; 100]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b"), [0u8; 28]).unwrap();
        assert_eq!(dir_size(dir.path()), 128);
    }

    #[test]
    fn format_size_picks_sensible_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2_048), "2.00 KB");
        assert_eq!(format_size(5_242_880), "5.00 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn age_rendering() {
        let now = SystemTime::now();
        assert_eq!(format_age(now), "today");
        assert_eq!(format_age(now - Duration::from_secs(86_400 + 60)), "1 day");
        assert_eq!(
            format_age(now - Duration::from_secs(41 * 86_400 + 60)),
            "41 days"
        );
        // Future timestamps clamp to zero rather than underflowing.
        assert_eq!(age_in_days(now + Duration::from_secs(3_600)), 0);
    }

    #[test]
    fn display_path_leaves_foreign_paths_alone() {
        assert_eq!(display_path(Path::new("/tmp/xyz")), "/tmp/xyz");
    }
}
