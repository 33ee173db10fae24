//! Extended attribute store.
//!
//! Lists, creates, renames, rewrites and removes the extended attributes of a file. Records
//! handed out by the [AttributeStore](store::AttributeStore) are plain value snapshots; whether
//! a record still matches what is on disk is computed from the snapshot itself.
pub mod record;
pub mod store;
pub mod xattr;

pub use record::{AttributeRecord, RecordId};
pub use store::AttributeStore;
pub use xattr::{OsXattrs, XattrApi};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Default error used throughout this crate
pub enum Error {
    #[error("failed to access `{}` - {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("attribute `{0}` already exists")]
    Duplicate(String),
    #[error("attribute `{0}` doesn't exist")]
    NotFound(String),
    #[error("attribute `{name}` was rejected - {source}")]
    InvalidName {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error(
        "removed attribute `{old}` but failed to write `{new}`, the attribute may now be missing - {source}"
    )]
    PartialCommit {
        old: String,
        new: String,
        #[source]
        source: Box<Error>,
    },
    #[error("xattrs changed while getting their size")]
    AttrsChanged,
    #[error("extended attributes are not supported for `{}`", .0.display())]
    Unsupported(PathBuf),
    #[error("error: {0}")]
    Other(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn empty_name() -> Self {
        Error::InvalidName {
            name: String::new(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "attribute name can't be empty",
            ),
        }
    }

    /// Whether this error left the attribute removed without its replacement being written.
    pub fn is_partial_commit(&self) -> bool {
        matches!(self, Error::PartialCommit { .. })
    }

    /// Whether this error means the attribute wasn't present on the file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_commit_keeps_cause_in_message() {
        let err = Error::PartialCommit {
            old: "user.foo".into(),
            new: "user.bar".into(),
            source: Box::new(Error::InvalidName {
                name: "user.bar".into(),
                source: io::Error::new(io::ErrorKind::Other, "value too large"),
            }),
        };

        assert!(err.is_partial_commit());
        assert!(!err.is_not_found());
        let msg = err.to_string();
        assert!(msg.contains("user.foo"));
        assert!(msg.contains("user.bar"));
        assert!(msg.contains("value too large"));
    }

    #[test]
    fn empty_name_is_invalid() {
        let err = Error::empty_name();
        assert!(matches!(err, Error::InvalidName { ref name, .. } if name.is_empty()));
        assert!(err.to_string().contains("can't be empty"));
    }
}
