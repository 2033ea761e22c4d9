use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

/// One stale version folder found during a scan.
#[derive(Debug, Clone)]
pub struct Target {
    pub path: PathBuf,
    pub last_access: SystemTime,
    pub size_bytes: u64,
}

/// Whether a run only reports matches or also deletes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Report,
    Remove,
}

/// Inputs for one scan invocation.
///
/// `root` is the cache root (packages at the first level, version
/// folders at the second). A version folder matches when its newest
/// last-access timestamp is at least `days` days old.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub days: u64,
    pub mode: Mode,
}

/// Cooperative cancellation handle.
///
/// Checked only at the package and version loop boundaries, so a
/// size computation or deletion already underway for one version
/// folder runs to completion before the scan stops.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A localized failure reported through the event sink.
///
/// None of these abort a running scan; the affected entry contributes
/// nothing to aggregates and traversal moves on.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to list {}: {source}", .path.display())]
    List { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to delete {}: {source}", .path.display())]
    Remove { path: PathBuf, source: io::Error },
}

/// Scan progress and results, delivered in discovery order.
#[derive(Debug)]
pub enum ScanEvent {
    /// A stale version folder was found (and, in remove mode, deleted).
    TargetFound(Target),
    /// Something went wrong with one entry; the scan keeps going.
    Error(ScanError),
    /// Always the final event, even after cancellation or a root
    /// listing failure. Carries the matched bytes accumulated so far.
    Complete { total_bytes: u64 },
}

/// Walk the two-level package cache and report or remove stale version
/// folders.
///
/// Results are communicated exclusively through `sink`; errors never
/// propagate out of the engine. Discovery order follows filesystem
/// enumeration order and is not guaranteed stable.
pub fn run(opts: &ScanOptions, cancel: &CancelFlag, sink: &mut dyn FnMut(ScanEvent)) {
    tracing::debug!(
        root = %opts.root.display(),
        days = opts.days,
        mode = ?opts.mode,
        "starting scan"
    );
    let total_bytes = walk_packages(opts, cancel, sink);
    sink(ScanEvent::Complete { total_bytes });
}

fn walk_packages(
    opts: &ScanOptions,
    cancel: &CancelFlag,
    sink: &mut dyn FnMut(ScanEvent),
) -> u64 {
    let packages = match fs::read_dir(&opts.root) {
        Ok(rd) => rd,
        Err(source) => {
            sink(ScanEvent::Error(ScanError::List {
                path: opts.root.clone(),
                source,
            }));
            return 0;
        }
    };

    let now = SystemTime::now();
    let threshold = Duration::from_secs(opts.days * 86_400);
    let mut total = 0u64;

    for package in subdirs(packages) {
        if cancel.is_cancelled() {
            break;
        }

        let versions = match fs::read_dir(&package) {
            Ok(rd) => rd,
            Err(source) => {
                sink(ScanEvent::Error(ScanError::List {
                    path: package.clone(),
                    source,
                }));
                continue;
            }
        };

        for version in subdirs(versions) {
            if cancel.is_cancelled() {
                break;
            }

            // An empty or unreadable subtree counts as just accessed,
            // so a folder we cannot judge is never deleted.
            let last_access = last_access_time(&version, sink).unwrap_or(now);
            let age = now.duration_since(last_access).unwrap_or_default();
            if age < threshold {
                continue;
            }

            let size_bytes = folder_size(&version, sink);
            sink(ScanEvent::TargetFound(Target {
                path: version.clone(),
                last_access,
                size_bytes,
            }));

            if opts.mode == Mode::Remove {
                tracing::debug!(path = %version.display(), "removing version folder");
                remove_tree(&version, sink);
                remove_package_if_empty(&package, sink);
            }
            total += size_bytes;
        }
    }
    total
}

/// Subdirectories of an open directory listing. Entries that cannot be
/// typed are skipped; symlinks are not followed.
fn subdirs(rd: fs::ReadDir) -> impl Iterator<Item = PathBuf> {
    rd.filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
}

/// Most recent access timestamp of any file under `dir`, recursively.
///
/// Falls back to the modified time when the access time is unavailable.
/// Unreadable entries are reported and contribute nothing; `None` means
/// no file could be read at all.
pub fn last_access_time(dir: &Path, sink: &mut dyn FnMut(ScanEvent)) -> Option<SystemTime> {
    let mut newest: Option<SystemTime> = None;

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(source) => {
                sink(ScanEvent::Error(ScanError::Walk {
                    path: dir.to_path_buf(),
                    source,
                }));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(source) => {
                sink(ScanEvent::Error(ScanError::Walk {
                    path: entry.path().to_path_buf(),
                    source,
                }));
                continue;
            }
        };
        let stamp = match meta.accessed().or_else(|_| meta.modified()) {
            Ok(t) => t,
            Err(_) => continue,
        };
        if newest.map(|n| stamp > n).unwrap_or(true) {
            newest = Some(stamp);
        }
    }
    newest
}

/// Total size in bytes of all files under `dir`, recursively.
///
/// Unreadable entries are reported through the sink and contribute
/// zero; the sum is independent of staleness.
pub fn folder_size(dir: &Path, sink: &mut dyn FnMut(ScanEvent)) -> u64 {
    let mut total = 0u64;

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(source) => {
                sink(ScanEvent::Error(ScanError::Walk {
                    path: dir.to_path_buf(),
                    source,
                }));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => total += meta.len(),
            Err(source) => {
                sink(ScanEvent::Error(ScanError::Walk {
                    path: entry.path().to_path_buf(),
                    source,
                }));
            }
        }
    }
    total
}

/// Depth-first deletion: subfolders first, then files, then `dir`
/// itself.
///
/// Every attempt is guarded on its own, so one stubborn entry still
/// lets its siblings go. Leftovers make the final `remove_dir` fail,
/// which is reported like any other entry.
pub fn remove_tree(dir: &Path, sink: &mut dyn FnMut(ScanEvent)) {
    match fs::read_dir(dir) {
        Ok(rd) => {
            let mut files = Vec::new();
            for entry in rd.filter_map(|e| e.ok()) {
                let path = entry.path();
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if is_dir {
                    remove_tree(&path, sink);
                } else {
                    files.push(path);
                }
            }
            for file in files {
                if let Err(source) = fs::remove_file(&file) {
                    sink(ScanEvent::Error(ScanError::Remove { path: file, source }));
                }
            }
        }
        Err(source) => {
            sink(ScanEvent::Error(ScanError::List {
                path: dir.to_path_buf(),
                source,
            }));
        }
    }

    if let Err(source) = fs::remove_dir(dir) {
        sink(ScanEvent::Error(ScanError::Remove {
            path: dir.to_path_buf(),
            source,
        }));
    }
}

/// Delete a package folder once its last version folder is gone.
fn remove_package_if_empty(package: &Path, sink: &mut dyn FnMut(ScanEvent)) {
    let empty = match fs::read_dir(package) {
        Ok(mut rd) => rd.next().is_none(),
        Err(source) => {
            sink(ScanEvent::Error(ScanError::List {
                path: package.to_path_buf(),
                source,
            }));
            return;
        }
    };
    if empty {
        if let Err(source) = fs::remove_dir(package) {
            sink(ScanEvent::Error(ScanError::Remove {
                path: package.to_path_buf(),
                source,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ignore_events() -> impl FnMut(ScanEvent) {
        |_| {}
    }

    #[test]
    fn cancel_flag_starts_clear() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
        assert!(flag.clone().is_cancelled());
    }

    #[test]
    fn folder_size_sums_nested_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), [0u8; 10]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.bin"), [0u8; 32]).unwrap();

        let mut sink = ignore_events();
        assert_eq!(folder_size(dir.path(), &mut sink), 42);
    }

    #[test]
    fn last_access_of_empty_dir_is_none() {
        let dir = tempdir().unwrap();
        let mut sink = ignore_events();
        assert_eq!(last_access_time(dir.path(), &mut sink), None);
    }

    #[test]
    fn last_access_finds_files_at_depth() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), b"x").unwrap();

        let mut sink = ignore_events();
        assert!(last_access_time(dir.path(), &mut sink).is_some());
    }

    #[test]
    fn remove_tree_deletes_everything() {
        let dir = tempdir().unwrap();
        let victim = dir.path().join("victim");
        fs::create_dir_all(victim.join("lib/net6.0")).unwrap();
        fs::write(victim.join("nuspec.xml"), b"meta").unwrap();
        fs::write(victim.join("lib/net6.0/pkg.dll"), b"code").unwrap();

        let mut events = Vec::new();
        remove_tree(&victim, &mut |e| events.push(e));

        assert!(!victim.exists());
        assert!(events.is_empty(), "unexpected errors: {events:?}");
    }
}
