use thiserror::Error;

/// Errors raised while turning content into kernel state.
///
/// The per-tick collision path never returns these; misses there are sentinel values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    #[error("unknown collision data byte {0:#04x}")]
    UnknownCollisionData(u8),

    #[error("layout dimensions mismatch: expected {expected} entries, got {actual}")]
    LayoutDimensions { expected: usize, actual: usize },

    #[error("{kind} palette has no entry {index}")]
    UnknownPaletteEntry { kind: &'static str, index: usize },

    #[error("invalid layout description: {0}")]
    InvalidLayout(String),

    #[error("invalid partition: {rows}x{cols} cells over a {width}x{height} area")]
    InvalidPartition {
        rows: usize,
        cols: usize,
        width: i32,
        height: i32,
    },

    #[error("invalid physics settings: {0}")]
    InvalidSettings(String),
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        KernelError::InvalidSettings(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            KernelError::UnknownCollisionData(0x7f).to_string(),
            "unknown collision data byte 0x7f"
        );
        assert_eq!(
            KernelError::UnknownPaletteEntry { kind: "block", index: 9 }.to_string(),
            "block palette has no entry 9"
        );
    }
}
