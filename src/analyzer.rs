use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// Disk usage of one version folder inside a package.
#[derive(Clone)]
pub struct VersionUsage {
    pub version: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Disk usage of one package, broken down by version.
#[derive(Clone)]
pub struct PackageUsage {
    pub name: String,
    pub path: PathBuf,
    pub total_bytes: u64,
    pub versions: Vec<VersionUsage>,
}

/// Measure every package in the cache and break its size down by version.
/// Uses parallel measurement via rayon for speed.
/// Calls `progress_fn(completed, total, current_package)` for UI updates.
pub fn analyze_cache(
    root: &Path,
    progress_fn: impl Fn(usize, usize, &str) + Send + Sync,
) -> Vec<PackageUsage> {
    // Collect all package dirs first (fast — just readdir)
    let package_dirs: Vec<(PathBuf, String)> = match std::fs::read_dir(root) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                (entry.path(), name)
            })
            .collect(),
        Err(_) => return vec![],
    };

    let total = package_dirs.len();
    let completed = Arc::new(AtomicUsize::new(0));

    // Parallel measurement of all packages
    let mut packages: Vec<PackageUsage> = package_dirs
        .into_par_iter()
        .map(|(path, name)| {
            progress_fn(completed.load(Ordering::Relaxed), total, &name);
            let usage = measure_package(&path, name);
            completed.fetch_add(1, Ordering::Relaxed);
            usage
        })
        .collect();

    // Sort by total size descending
    packages.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    packages
}

fn measure_package(package_path: &Path, name: String) -> PackageUsage {
    let mut total_bytes = 0u64;
    let mut by_version: BTreeMap<String, u64> = BTreeMap::new();

    for entry in WalkDir::new(package_path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        total_bytes += size;

        // Attribute the file to its version folder, the first path
        // component below the package. Files sitting directly in the
        // package dir count toward the total only.
        if let Ok(rel) = entry.path().strip_prefix(package_path) {
            let mut comps = rel.components();
            if let (Some(first), Some(_)) = (comps.next(), comps.next()) {
                let version = first.as_os_str().to_string_lossy().to_string();
                *by_version.entry(version).or_insert(0) += size;
            }
        }
    }

    let mut versions: Vec<VersionUsage> = by_version
        .into_iter()
        .map(|(version, size_bytes)| VersionUsage {
            path: package_path.join(&version),
            version,
            size_bytes,
        })
        .collect();
    versions.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));

    PackageUsage {
        name,
        path: package_path.to_path_buf(),
        total_bytes,
        versions,
    }
}
