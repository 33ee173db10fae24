//! Snapshots of a single extended attribute as seen and edited by a caller.
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a record. Unique for the lifetime of the process and unrelated to the name or
/// value of the attribute, so it survives renames.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        RecordId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One extended attribute of one file at a point in time.
///
/// `original_name` and `original_value` are the last values known to be persisted, `name` and
/// `value` are the current, possibly edited, ones. A `None` value means the attribute has no
/// displayable value (for example binary data that isn't valid UTF-8).
///
/// Names reported by the operating system don't have to be valid UTF-8 either. `original_name`
/// is then a lossy rendition for display while the exact bytes are kept in `os_name`, which is
/// what the store addresses on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeRecord {
    id: RecordId,
    os_name: OsString,
    original_name: String,
    original_value: Option<String>,
    name: String,
    value: Option<String>,
}

impl AttributeRecord {
    /// Creates a clean record with a fresh id.
    pub fn new<S>(name: S, value: Option<String>) -> Self
    where
        S: Into<String>,
    {
        let name = name.into();
        Self {
            id: RecordId::next(),
            os_name: OsString::from(&name),
            original_name: name.clone(),
            original_value: value.clone(),
            name,
            value,
        }
    }

    /// Creates a clean record for the attribute stored under the raw name `os_name`.
    pub(crate) fn from_os_name(os_name: OsString, value: Option<String>) -> Self {
        let name = os_name.to_string_lossy().into_owned();
        Self {
            os_name,
            ..Self::new(name, value)
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The value as shown to a user, empty when there is no displayable value.
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn original_value(&self) -> Option<&str> {
        self.original_value.as_deref()
    }

    /// The exact name the original attribute is stored under on disk.
    pub fn os_name(&self) -> &OsStr {
        &self.os_name
    }

    /// Whether the current name or value differ from the persisted ones.
    pub fn is_dirty(&self) -> bool {
        self.name != self.original_name || self.value != self.original_value
    }

    /// Whether committing this record will move the attribute to a new name.
    pub fn is_renamed(&self) -> bool {
        self.name != self.original_name
    }

    /// Returns a copy of this record with the name changed to `name`.
    pub fn with_name<S>(&self, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this record with the value changed to `value`.
    pub fn with_value<S>(&self, value: Option<S>) -> Self
    where
        S: Into<String>,
    {
        Self {
            value: value.map(Into::into),
            ..self.clone()
        }
    }

    /// Returns a copy of this record with all unsaved edits discarded.
    pub fn reverted(&self) -> Self {
        Self {
            name: self.original_name.clone(),
            value: self.original_value.clone(),
            ..self.clone()
        }
    }

    /// Marks the current name and value as persisted.
    pub(crate) fn synced(&self) -> Self {
        Self {
            os_name: OsString::from(&self.name),
            original_name: self.name.clone(),
            original_value: self.value.clone(),
            ..self.clone()
        }
    }
}

impl fmt::Display for AttributeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
