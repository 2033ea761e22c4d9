use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable NuGet honors to relocate the global packages folder.
const PACKAGES_ENV: &str = "NUGET_PACKAGES";

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("NUGET_PACKAGES must contain an absolute path, got {}", .0.display())]
    NotAbsolute(PathBuf),

    #[error("no global packages folder at {}; pass --path explicitly", .0.display())]
    Missing(PathBuf),

    #[error("could not determine the home directory")]
    NoHome,
}

/// Locate the NuGet global packages folder.
///
/// The `NUGET_PACKAGES` override wins when set; otherwise the default
/// `~/.nuget/packages` is used and must already exist.
pub fn global_packages_dir() -> Result<PathBuf, PathError> {
    resolve(env::var_os(PACKAGES_ENV), dirs::home_dir())
}

fn resolve(override_var: Option<OsString>, home: Option<PathBuf>) -> Result<PathBuf, PathError> {
    if let Some(raw) = override_var {
        let path = PathBuf::from(raw);
        if !path.is_absolute() {
            return Err(PathError::NotAbsolute(path));
        }
        return Ok(path);
    }

    let fallback = home.ok_or(PathError::NoHome)?.join(".nuget").join("packages");
    if fallback.is_dir() {
        Ok(fallback)
    } else {
        Err(PathError::Missing(fallback))
    }
}
