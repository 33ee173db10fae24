#![cfg(not(any(target_os = "linux", target_os = "macos")))]
use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::{Error, Result};

pub fn list_names(path: &Path, _follow: bool) -> Result<Vec<OsString>> {
    Err(Error::Unsupported(path.to_path_buf()))
}

pub fn get_value(path: &Path, _name: &OsStr, _follow: bool) -> Result<Vec<u8>> {
    Err(Error::Unsupported(path.to_path_buf()))
}

pub fn set_value(path: &Path, _name: &OsStr, _value: &[u8], _follow: bool) -> Result<()> {
    Err(Error::Unsupported(path.to_path_buf()))
}

pub fn create_value(path: &Path, _name: &OsStr, _value: &[u8], _follow: bool) -> Result<()> {
    Err(Error::Unsupported(path.to_path_buf()))
}

pub fn remove_value(path: &Path, _name: &OsStr, _follow: bool) -> Result<()> {
    Err(Error::Unsupported(path.to_path_buf()))
}
