#![cfg(any(target_os = "linux", target_os = "macos"))]
#[cfg(target_os = "macos")]
use libc::XATTR_NOFOLLOW;
use libc::{getxattr, listxattr, removexattr, setxattr, XATTR_CREATE};
#[cfg(target_os = "linux")]
use libc::{lgetxattr, llistxattr, lremovexattr, lsetxattr};
use std::ffi::{CStr, CString, OsStr, OsString};
use std::io;
use std::os::raw::{c_char, c_int, c_void};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use crate::{Error, Result};

#[cfg(target_os = "linux")]
const ENOATTR: c_int = libc::ENODATA;
#[cfg(target_os = "macos")]
const ENOATTR: c_int = libc::ENOATTR;

const NAME_MAX: usize = 255;

/// Retrieves the raw names of all extended attributes associated with the given `path`. When
/// `follow` is false and `path` is a symbolic link the names are read from the link itself.
pub fn list_names(path: &Path, follow: bool) -> Result<Vec<OsString>> {
    let cpath = path_cstring(path)?;
    let raw = list_xattrs_raw(path, cpath.as_c_str(), follow)?;

    Ok(parse_xattrs(&raw))
}

/// Retrieves the raw value of the extended attribute identified by `name`.
pub fn get_value(path: &Path, name: &OsStr, follow: bool) -> Result<Vec<u8>> {
    let cpath = path_cstring(path)?;
    let cname = name_cstring(name)?;
    let size = get_xattr_size(path, cpath.as_c_str(), name, cname.as_c_str(), follow)?;
    let mut buf = vec![0u8; size];

    let ret = unsafe {
        __getxattr(
            cpath.as_ptr(),
            cname.as_ptr(),
            buf.as_mut_ptr() as *mut c_void,
            size,
            follow,
        )
    };

    if ret == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ERANGE) {
            return Err(Error::AttrsChanged);
        }
        return Err(os_error(err, path, Some(name)));
    }

    if ret as usize != size {
        return Err(Error::AttrsChanged);
    }

    Ok(buf)
}

/// Sets the value of the extended attribute identified by `name`, creating it or overwriting
/// the current value.
pub fn set_value(path: &Path, name: &OsStr, value: &[u8], follow: bool) -> Result<()> {
    _set_xattr(path, name, value, 0, follow)
}

/// Same as [`set_value`](set_value) but fails with [Error::Duplicate](crate::Error::Duplicate)
/// if the attribute already exists.
pub fn create_value(path: &Path, name: &OsStr, value: &[u8], follow: bool) -> Result<()> {
    _set_xattr(path, name, value, XATTR_CREATE, follow)
}

/// Removes the extended attribute identified by `name`.
pub fn remove_value(path: &Path, name: &OsStr, follow: bool) -> Result<()> {
    let cpath = path_cstring(path)?;
    let cname = name_cstring(name)?;

    let ret = unsafe { __removexattr(cpath.as_ptr(), cname.as_ptr(), follow) };
    if ret != 0 {
        return Err(os_error(io::Error::last_os_error(), path, Some(name)));
    }

    Ok(())
}

//################################################################################
// Wrappers
//################################################################################

#[cfg(target_os = "linux")]
unsafe fn __getxattr(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_void,
    size: usize,
    follow: bool,
) -> isize {
    let func = if follow { getxattr } else { lgetxattr };

    func(path, name, value, size)
}

#[cfg(target_os = "macos")]
unsafe fn __getxattr(
    path: *const c_char,
    name: *const c_char,
    value: *mut c_void,
    size: usize,
    follow: bool,
) -> isize {
    let opts = if follow { 0 } else { XATTR_NOFOLLOW };

    getxattr(path, name, value, size, 0, opts)
}

#[cfg(target_os = "linux")]
unsafe fn __setxattr(
    path: *const c_char,
    name: *const c_char,
    value: *const c_void,
    size: usize,
    flags: c_int,
    follow: bool,
) -> c_int {
    let func = if follow { setxattr } else { lsetxattr };

    func(path, name, value, size, flags)
}

#[cfg(target_os = "macos")]
unsafe fn __setxattr(
    path: *const c_char,
    name: *const c_char,
    value: *const c_void,
    size: usize,
    flags: c_int,
    follow: bool,
) -> c_int {
    let opts = if follow { 0 } else { XATTR_NOFOLLOW };

    setxattr(path, name, value, size, 0, opts | flags)
}

#[cfg(target_os = "linux")]
unsafe fn __removexattr(path: *const c_char, name: *const c_char, follow: bool) -> c_int {
    let func = if follow { removexattr } else { lremovexattr };

    func(path, name)
}

#[cfg(target_os = "macos")]
unsafe fn __removexattr(path: *const c_char, name: *const c_char, follow: bool) -> c_int {
    let opts = if follow { 0 } else { XATTR_NOFOLLOW };

    removexattr(path, name, opts)
}

#[cfg(target_os = "linux")]
unsafe fn __listxattr(path: *const c_char, list: *mut c_char, size: usize, follow: bool) -> isize {
    let func = if follow { listxattr } else { llistxattr };

    func(path, list, size)
}

#[cfg(target_os = "macos")]
unsafe fn __listxattr(path: *const c_char, list: *mut c_char, size: usize, follow: bool) -> isize {
    let opts = if follow { 0 } else { XATTR_NOFOLLOW };

    listxattr(path, list, size, opts)
}

//################################################################################
// Impl
//################################################################################

fn _set_xattr(path: &Path, name: &OsStr, value: &[u8], flags: c_int, follow: bool) -> Result<()> {
    let cpath = path_cstring(path)?;
    let cname = name_cstring(name)?;

    let ret = unsafe {
        __setxattr(
            cpath.as_ptr(),
            cname.as_ptr(),
            value.as_ptr() as *const c_void,
            value.len(),
            flags,
            follow,
        )
    };

    if ret != 0 {
        return Err(os_error(io::Error::last_os_error(), path, Some(name)));
    }

    Ok(())
}

//################################################################################
// Other
//################################################################################

fn path_cstring(path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|e| Error::Access {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })
}

fn name_cstring(name: &OsStr) -> Result<CString> {
    if name.is_empty() {
        return Err(Error::empty_name());
    }
    CString::new(name.as_bytes()).map_err(|e| Error::InvalidName {
        name: name.to_string_lossy().into_owned(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })
}

/// Classifies an error returned by one of the xattr syscalls. `name` is `None` for calls that
/// only address the path.
fn os_error(err: io::Error, path: &Path, name: Option<&OsStr>) -> Error {
    let code = match err.raw_os_error() {
        Some(code) => code,
        None => return Error::Other(err),
    };
    let name = name.map(|name| name.to_string_lossy().into_owned());

    match name {
        Some(name) if code == libc::EEXIST => Error::Duplicate(name),
        Some(name) if code == ENOATTR => Error::NotFound(name),
        Some(name) if is_rejected_name(code) => Error::InvalidName { name, source: err },
        // macOS reports names longer than XATTR_MAXNAMELEN this way
        Some(name) if code == libc::ENAMETOOLONG && !is_path_too_long(path) => {
            Error::InvalidName { name, source: err }
        }
        None if code == libc::ENOTSUP || code == libc::EOPNOTSUPP => {
            Error::Unsupported(path.to_path_buf())
        }
        _ if is_access(code) => Error::Access {
            path: path.to_path_buf(),
            source: err,
        },
        _ => Error::Other(err),
    }
}

fn is_rejected_name(code: c_int) -> bool {
    code == libc::ERANGE
        || code == libc::E2BIG
        || code == libc::EINVAL
        || code == libc::ENOTSUP
        || code == libc::EOPNOTSUPP
}

fn is_access(code: c_int) -> bool {
    code == libc::ENOENT
        || code == libc::ENOTDIR
        || code == libc::EACCES
        || code == libc::EPERM
        || code == libc::ELOOP
        || code == libc::ENAMETOOLONG
}

/// Whether `path` itself exceeds the limits that make a syscall fail with `ENAMETOOLONG`.
fn is_path_too_long(path: &Path) -> bool {
    path.as_os_str().len() >= libc::PATH_MAX as usize
        || path
            .components()
            .any(|component| component.as_os_str().len() > NAME_MAX)
}

fn get_xattr_size(
    path: &Path,
    cpath: &CStr,
    name: &OsStr,
    cname: &CStr,
    follow: bool,
) -> Result<usize> {
    let ret = unsafe { __getxattr(cpath.as_ptr(), cname.as_ptr(), ptr::null_mut(), 0, follow) };

    if ret == -1 {
        return Err(os_error(io::Error::last_os_error(), path, Some(name)));
    }

    Ok(ret as usize)
}

fn get_xattrs_list_size(path: &Path, cpath: &CStr, follow: bool) -> Result<usize> {
    let ret = unsafe { __listxattr(cpath.as_ptr(), ptr::null_mut(), 0, follow) };

    if ret == -1 {
        return Err(os_error(io::Error::last_os_error(), path, None));
    }

    Ok(ret as usize)
}

fn list_xattrs_raw(path: &Path, cpath: &CStr, follow: bool) -> Result<Vec<u8>> {
    let size = get_xattrs_list_size(path, cpath, follow)?;
    let mut buf = vec![0u8; size];

    let ret = unsafe { __listxattr(cpath.as_ptr(), buf.as_mut_ptr() as *mut c_char, size, follow) };

    if ret == -1 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ERANGE) {
            return Err(Error::AttrsChanged);
        }
        return Err(os_error(err, path, None));
    }

    if ret as usize != size {
        return Err(Error::AttrsChanged);
    }

    Ok(buf)
}

fn parse_xattrs(input: &[u8]) -> Vec<OsString> {
    input
        .split(|ch| *ch == b'\0')
        .filter(|key| !key.is_empty())
        .map(|key| OsStr::from_bytes(key).to_os_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn parses_xattrs_from_raw() {
        let raw = b"user.key1\0user.key2\0user.key3\0security.testing\0";

        let attrs = parse_xattrs(raw);
        let mut it = attrs.iter().map(|name| name.to_str());

        assert_eq!(it.next(), Some(Some("user.key1")));
        assert_eq!(it.next(), Some(Some("user.key2")));
        assert_eq!(it.next(), Some(Some("user.key3")));
        assert_eq!(it.next(), Some(Some("security.testing")));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn parses_empty_list() {
        assert!(parse_xattrs(b"").is_empty());
    }

    #[test]
    fn keeps_non_utf8_names_intact() {
        let attrs = parse_xattrs(b"user.\xff\0user.ok\0");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].as_bytes(), b"user.\xff");
        assert_eq!(attrs[1], "user.ok");
    }

    #[test]
    fn rejects_names_with_nul() {
        let err = name_cstring(OsStr::new("user.a\0b")).unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(matches!(
            name_cstring(OsStr::new("")),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn classifies_errno() {
        let path = Path::new("/tmp/file");
        let name = Some(OsStr::new("user.a"));
        let err = |code| io::Error::from_raw_os_error(code);

        assert!(matches!(
            os_error(err(libc::EEXIST), path, name),
            Error::Duplicate(name) if name == "user.a"
        ));
        assert!(matches!(
            os_error(err(ENOATTR), path, name),
            Error::NotFound(name) if name == "user.a"
        ));
        assert!(matches!(
            os_error(err(libc::ERANGE), path, name),
            Error::InvalidName { .. }
        ));
        assert!(matches!(
            os_error(err(libc::ENOTSUP), path, name),
            Error::InvalidName { .. }
        ));
        assert!(matches!(
            os_error(err(libc::ENOENT), path, name),
            Error::Access { .. }
        ));
        assert!(matches!(
            os_error(err(libc::EACCES), path, None),
            Error::Access { .. }
        ));
        assert!(matches!(
            os_error(err(libc::ENOSPC), path, name),
            Error::Other(_)
        ));
        assert!(matches!(
            os_error(err(libc::ENOTSUP), path, None),
            Error::Unsupported(_)
        ));
        assert!(matches!(
            os_error(err(libc::ENAMETOOLONG), path, name),
            Error::InvalidName { name, .. } if name == "user.a"
        ));
        assert!(matches!(
            os_error(err(libc::ENAMETOOLONG), path, None),
            Error::Access { .. }
        ));

        let long_path = Path::new("/tmp").join("x".repeat(NAME_MAX + 1));
        assert!(matches!(
            os_error(err(libc::ENAMETOOLONG), &long_path, name),
            Error::Access { .. }
        ));
    }

    #[test]
    fn missing_file_is_access_error() {
        let tmp = TempDir::new("xattr-unix").unwrap();
        let missing = tmp.path().join("missing");

        assert!(matches!(
            list_names(&missing, true),
            Err(Error::Access { .. })
        ));
        assert!(matches!(
            get_value(&missing, OsStr::new("user.a"), true),
            Err(Error::Access { .. })
        ));
    }

    #[test]
    fn sets_gets_and_removes_raw_values() {
        let tmp = TempDir::new("xattr-unix").unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, b"content").unwrap();

        if set_value(&file, OsStr::new("user.probe"), b"1", true).is_err() {
            // filesystem of the temp dir doesn't support user xattrs
            return;
        }
        let bin = OsStr::new("user.bin");

        set_value(&file, bin, &[0xff, 0x00, 0xfe], true).unwrap();
        assert_eq!(get_value(&file, bin, true).unwrap(), vec![0xff, 0x00, 0xfe]);

        set_value(&file, bin, b"", true).unwrap();
        assert!(get_value(&file, bin, true).unwrap().is_empty());

        assert!(matches!(
            create_value(&file, bin, b"x", true),
            Err(Error::Duplicate(_))
        ));

        let names = list_names(&file, true).unwrap();
        assert!(names.iter().any(|name| name == "user.probe"));
        assert!(names.iter().any(|name| name == bin));

        remove_value(&file, bin, true).unwrap();
        assert!(matches!(
            remove_value(&file, bin, true),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            get_value(&file, bin, true),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn reads_values_of_non_utf8_names() {
        let tmp = TempDir::new("xattr-unix").unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, b"content").unwrap();

        let raw = OsStr::from_bytes(b"user.\xff");
        if set_value(&file, raw, b"1", true).is_err() {
            return;
        }

        let names = list_names(&file, true).unwrap();
        assert_eq!(names, vec![raw.to_os_string()]);
        assert_eq!(get_value(&file, &names[0], true).unwrap(), b"1".to_vec());
        remove_value(&file, &names[0], true).unwrap();
        assert!(list_names(&file, true).unwrap().is_empty());
    }
}
