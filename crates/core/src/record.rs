use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a record across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// Anything that can sit in a page window. Identity is the only property
/// the selection engine looks at.
pub trait Record {
    fn id(&self) -> RecordId;
}

impl<R: Record + ?Sized> Record for &R {
    fn id(&self) -> RecordId {
        (**self).id()
    }
}
