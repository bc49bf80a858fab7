//! Object identifiers.
//!
//! Committed drawables get a minted id of the form `<kind>-<n>` (`rect-3`,
//! `line-12`); the gesture preview always carries the single reserved
//! [`ObjectId::preview`] id, so dragging never mints. Ids are interned, so
//! they are `Copy` and compare in O(1). Ids coming back from the host are
//! resolved with [`ObjectId::lookup`], which never adds to the interner.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static NAMES: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

const PREVIEW_NAME: &str = "preview";

static PREVIEW: LazyLock<ObjectId> =
    LazyLock::new(|| ObjectId(NAMES.get_or_intern_static(PREVIEW_NAME)));

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Spur);

impl ObjectId {
    /// Mint a new id for a committed drawable of `kind`.
    pub fn mint(kind: &str) -> Self {
        let serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        Self(NAMES.get_or_intern(format!("{kind}-{serial}")))
    }

    /// The id every gesture preview carries.
    pub fn preview() -> Self {
        *PREVIEW
    }

    /// Resolve an id string from the host. Unknown strings yield `None`.
    pub fn lookup(name: &str) -> Option<Self> {
        NAMES.get(name).map(Self)
    }

    pub fn as_str(&self) -> &str {
        NAMES.resolve(&self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.as_str())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Snapshot blobs only ever hold minted ids, so decoding re-interns names
/// that are already present.
impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self(NAMES.get_or_intern(name)))
    }
}
