//! Read, create, commit and remove extended attributes of a file as [AttributeRecord]s.
use std::ffi::OsStr;
use std::path::Path;

use crate::record::AttributeRecord;
use crate::xattr::{OsXattrs, XattrApi};
use crate::{Error, Result};

/// Translates record level operations into extended attribute calls on a path.
///
/// The store keeps no state between calls. Every operation re-resolves the path it is given and
/// blocks until the underlying calls complete.
#[derive(Clone, Debug, Default)]
pub struct AttributeStore<X = OsXattrs> {
    xattrs: X,
}

impl AttributeStore<OsXattrs> {
    /// Creates a store backed by the operating system, following symbolic links.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<X: XattrApi> AttributeStore<X> {
    pub fn with_backend(xattrs: X) -> Self {
        Self { xattrs }
    }

    pub fn backend(&self) -> &X {
        &self.xattrs
    }

    /// Lists all attributes of the file at the given `path` sorted by name.
    ///
    /// Values that aren't valid UTF-8 or that couldn't be read are returned as `None` so that a
    /// single bad attribute doesn't hide the others. Attributes removed while listing are skipped.
    /// Names that aren't valid UTF-8 are displayed lossily but still read and edited by their
    /// exact bytes.
    pub fn list<P>(&self, path: P) -> Result<Vec<AttributeRecord>>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut names = self.xattrs.list_names(path)?;
        names.sort();
        names.dedup();

        log::debug!("listing {} attributes of {}", names.len(), path.display());

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let value = match self.xattrs.get_value(path, &name) {
                Ok(bytes) => String::from_utf8(bytes).ok(),
                Err(Error::NotFound(_)) => {
                    log::debug!("attribute {name:?} of {} vanished", path.display());
                    continue;
                }
                Err(e) => {
                    if matches!(e, Error::Access { .. }) {
                        // the path itself may have become unreachable
                        self.xattrs.list_names(path)?;
                    }
                    log::warn!(
                        "failed to read attribute {name:?} of {}, reason: {e}",
                        path.display()
                    );
                    None
                }
            };
            records.push(AttributeRecord::from_os_name(name, value));
        }

        Ok(records)
    }

    /// Reads a single attribute of the file at the given `path`. If the attribute doesn't
    /// exist returns [Error::NotFound](crate::Error::NotFound).
    pub fn get<P, S>(&self, path: P, name: S) -> Result<AttributeRecord>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(Error::empty_name());
        }

        let bytes = self.xattrs.get_value(path.as_ref(), OsStr::new(name))?;
        Ok(AttributeRecord::new(name, String::from_utf8(bytes).ok()))
    }

    /// Adds a new attribute `name` with `value` to the file at the given `path`. If the
    /// attribute already exists returns [Error::Duplicate](crate::Error::Duplicate) and leaves
    /// the existing value untouched.
    pub fn create<P, S>(&self, path: P, name: S, value: S) -> Result<AttributeRecord>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let name = name.as_ref();
        let value = value.as_ref();
        if name.is_empty() {
            return Err(Error::empty_name());
        }

        log::debug!("creating attribute `{name}` on {}", path.display());
        self.xattrs
            .create_value(path, OsStr::new(name), value.as_bytes())?;

        Ok(AttributeRecord::new(name, Some(value.to_string())))
    }

    /// Persists the edits of `record` to the file at the given `path` and returns the record
    /// as it now is on disk.
    ///
    /// A clean record is returned as is without touching the file. Otherwise the attribute
    /// stored under the original name is removed and the current name is written with the
    /// current value. If the removal succeeded but the write failed, the returned
    /// [Error::PartialCommit](crate::Error::PartialCommit) signals that neither name is present
    /// anymore.
    pub fn commit<P>(&self, path: P, record: &AttributeRecord) -> Result<AttributeRecord>
    where
        P: AsRef<Path>,
    {
        if !record.is_dirty() {
            return Ok(record.clone());
        }
        if record.name().is_empty() {
            return Err(Error::empty_name());
        }

        let path = path.as_ref();
        let old = record.original_name();
        let new = record.name();
        log::debug!("committing `{old}` as `{new}` on {}", path.display());

        self.xattrs.remove_value(path, record.os_name())?;

        let value = record.value().unwrap_or_default();
        if let Err(e) = self
            .xattrs
            .set_value(path, OsStr::new(new), value.as_bytes())
        {
            log::error!(
                "attribute `{old}` of {} was removed but `{new}` couldn't be written",
                path.display()
            );
            return Err(Error::PartialCommit {
                old: old.to_string(),
                new: new.to_string(),
                source: Box::new(e),
            });
        }

        Ok(record.synced())
    }

    /// Removes the attribute of `record` from the file at the given `path`.
    ///
    /// The attribute is removed by its original name, unsaved renames are ignored. If the
    /// attribute doesn't exist returns [Error::NotFound](crate::Error::NotFound).
    pub fn remove<P>(&self, path: P, record: &AttributeRecord) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::debug!(
            "removing attribute `{}` from {}",
            record.original_name(),
            path.display()
        );
        self.xattrs.remove_value(path, record.os_name())
    }
}
