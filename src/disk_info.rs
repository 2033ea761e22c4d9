use std::path::Path;

pub struct DiskInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

impl DiskInfo {
    pub fn usage_percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f32 / self.total as f32
    }
}

/// Usage of the filesystem holding `path`, via statvfs.
#[cfg(unix)]
pub fn disk_info(path: &Path) -> Option<DiskInfo> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).ok()?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    let stat = unsafe { stat.assume_init() };
    let block_size = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * block_size;
    let available = stat.f_bavail as u64 * block_size;
    let used = total.saturating_sub(available);
    Some(DiskInfo {
        total,
        available,
        used,
    })
}

#[cfg(not(unix))]
pub fn disk_info(_path: &Path) -> Option<DiskInfo> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reports_consistent_numbers_for_a_real_path() {
        let dir = tempdir().unwrap();
        let info = disk_info(dir.path()).expect("statvfs on a tempdir");
        assert!(info.total > 0);
        assert!(info.used <= info.total);
        assert!((0.0..=1.0).contains(&info.usage_percent()));
    }

    #[test]
    fn missing_path_yields_none() {
        let dir = tempdir().unwrap();
        assert!(disk_info(&dir.path().join("nope")).is_none());
    }
}
