use crate::error::TunerError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A Lambda memory allocation in megabytes, restricted to the sizes the tool
/// offers.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct MemorySize(u16);

impl MemorySize {
    pub const ALLOWED: [MemorySize; 8] = [
        MemorySize(128),
        MemorySize(256),
        MemorySize(512),
        MemorySize(1024),
        MemorySize(2048),
        MemorySize(4096),
        MemorySize(8192),
        MemorySize(10240),
    ];

    pub const DEFAULT_SELECTION: [MemorySize; 4] = [
        MemorySize(128),
        MemorySize(512),
        MemorySize(1024),
        MemorySize(2048),
    ];

    pub fn mb(self) -> u16 {
        self.0
    }

    pub fn variants() -> &'static [MemorySize] {
        &Self::ALLOWED
    }
}

impl TryFrom<u16> for MemorySize {
    type Error = TunerError;

    fn try_from(mb: u16) -> Result<Self, Self::Error> {
        Self::ALLOWED
            .iter()
            .copied()
            .find(|memory| memory.0 == mb)
            .ok_or(TunerError::UnsupportedMemory(mb))
    }
}

impl From<MemorySize> for u16 {
    fn from(memory: MemorySize) -> Self {
        memory.0
    }
}

impl Display for MemorySize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
