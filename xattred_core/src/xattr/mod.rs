//! Safe wrappers for manipulating extended attributes and the [XattrApi](XattrApi) seam the
//! store talks to.
#[cfg(any(target_os = "linux", target_os = "macos"))]
mod unix;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

#[cfg(any(target_os = "linux", target_os = "macos"))]
use unix as os;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use unsupported as os;

use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::{fs, io};

/// The primitive extended attribute operations, keyed by `(path, name)`.
///
/// Names are the raw bytes the operating system reports, they don't have to be valid UTF-8.
pub trait XattrApi {
    /// Lists the names of all attributes present on `path`.
    fn list_names(&self, path: &Path) -> Result<Vec<OsString>>;

    /// Reads the raw value of the attribute `name`.
    fn get_value(&self, path: &Path, name: &OsStr) -> Result<Vec<u8>>;

    /// Creates the attribute `name` or overwrites its value.
    fn set_value(&self, path: &Path, name: &OsStr, value: &[u8]) -> Result<()>;

    /// Removes the attribute `name`.
    fn remove_value(&self, path: &Path, name: &OsStr) -> Result<()>;

    /// Creates the attribute `name`, failing with [Error::Duplicate](crate::Error::Duplicate) if
    /// it is already present.
    fn create_value(&self, path: &Path, name: &OsStr, value: &[u8]) -> Result<()> {
        if self.list_names(path)?.iter().any(|n| n.as_os_str() == name) {
            return Err(Error::Duplicate(name.to_string_lossy().into_owned()));
        }
        self.set_value(path, name, value)
    }
}

/// Extended attributes as exposed by the operating system.
#[derive(Clone, Copy, Debug)]
pub struct OsXattrs {
    follow_symlinks: bool,
}

impl Default for OsXattrs {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
        }
    }
}

impl OsXattrs {
    /// When `follow_symlinks` is false and the target path is a symbolic link the attributes of
    /// the link itself are used instead of the attributes of the file it points to.
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }

    pub fn follows_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// Verifies that `path` exists and is something that may carry attributes.
    fn check_target(&self, path: &Path) -> Result<()> {
        let metadata = if self.follow_symlinks {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        };
        let file_type = metadata
            .map_err(|source| Error::Access {
                path: path.to_path_buf(),
                source,
            })?
            .file_type();

        if file_type.is_file() || file_type.is_dir() || file_type.is_symlink() {
            Ok(())
        } else {
            Err(Error::Access {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "not a regular file or directory",
                ),
            })
        }
    }
}

impl XattrApi for OsXattrs {
    fn list_names(&self, path: &Path) -> Result<Vec<OsString>> {
        log::trace!("listxattr {}", path.display());
        self.check_target(path)?;
        os::list_names(path, self.follow_symlinks)
    }

    fn get_value(&self, path: &Path, name: &OsStr) -> Result<Vec<u8>> {
        log::trace!("getxattr {} {:?}", path.display(), name);
        os::get_value(path, name, self.follow_symlinks)
    }

    fn set_value(&self, path: &Path, name: &OsStr, value: &[u8]) -> Result<()> {
        log::trace!("setxattr {} {:?} ({} bytes)", path.display(), name, value.len());
        os::set_value(path, name, value, self.follow_symlinks)
    }

    fn remove_value(&self, path: &Path, name: &OsStr) -> Result<()> {
        log::trace!("removexattr {} {:?}", path.display(), name);
        os::remove_value(path, name, self.follow_symlinks)
    }

    fn create_value(&self, path: &Path, name: &OsStr, value: &[u8]) -> Result<()> {
        log::trace!(
            "setxattr(create) {} {:?} ({} bytes)",
            path.display(),
            name,
            value.len()
        );
        os::create_value(path, name, value, self.follow_symlinks)
    }
}
