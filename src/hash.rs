use crate::error::{FlexIdError, Result};
use sha2::{Digest, Sha256};

const DIGEST_LEN: usize = 32;

/// Width of the digest slice used as a shard value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowWidth {
    Bits16,
    Bits32,
}

impl WindowWidth {
    const fn bytes(self) -> usize {
        match self {
            Self::Bits16 => 2,
            Self::Bits32 => 4,
        }
    }

    const fn bits(self) -> u8 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
        }
    }
}

/// A big-endian window into a SHA-256 digest, read as the shard of a key.
///
/// The default reads the first four bytes of the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardWindow {
    width: WindowWidth,
    offset: usize,
}

impl ShardWindow {
    /// Creates a window of `width` starting at byte `offset` of the digest.
    ///
    /// # Errors
    ///
    /// Returns `InvalidShardWindow` if the window would read past the 32-byte digest.
    pub const fn new(width: WindowWidth, offset: usize) -> Result<Self> {
        if offset > DIGEST_LEN - width.bytes() {
            return Err(FlexIdError::InvalidShardWindow {
                offset,
                width: width.bits(),
            });
        }
        Ok(Self { width, offset })
    }

    #[must_use]
    pub const fn width(&self) -> WindowWidth {
        self.width
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn read(self, digest: &[u8]) -> u32 {
        digest
            .get(self.offset..self.offset + self.width.bytes())
            .map_or(0, |window| {
                window
                    .iter()
                    .fold(0, |acc, byte| (acc << 8) | u32::from(*byte))
            })
    }
}

impl Default for ShardWindow {
    fn default() -> Self {
        Self {
            width: WindowWidth::Bits32,
            offset: 0,
        }
    }
}

/// Shard value of `key` using the default window: the first four bytes of its SHA-256 digest.
///
/// An empty key maps to shard 0. The result is not yet truncated to any shard width.
#[must_use]
pub fn shard_from_key(key: &str) -> u32 {
    shard_from_key_in(key, ShardWindow::default())
}

/// Shard value of `key` read through `window`.
#[must_use]
pub fn shard_from_key_in(key: &str, window: ShardWindow) -> u32 {
    if key.is_empty() {
        return 0;
    }
    let digest = Sha256::digest(key.as_bytes());
    window.read(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shard_from_key_known_value() {
        // SHA256("test") = 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08
        assert_eq!(shard_from_key("test"), 0x9f86_d081);
    }

    #[test]
    fn test_shard_from_key_empty() {
        assert_eq!(shard_from_key(""), 0);
    }

    #[test]
    fn test_shard_from_key_deterministic() {
        assert_eq!(shard_from_key("user-42"), shard_from_key("user-42"));
    }

    #[test]
    fn test_shard_from_key_different_keys() {
        assert_ne!(shard_from_key("user-42"), shard_from_key("user-43"));
    }

    #[test]
    fn test_sixteen_bit_window() {
        let window = ShardWindow::new(WindowWidth::Bits16, 0).unwrap();
        assert_eq!(shard_from_key_in("test", window), 0x9f86);

        let window = ShardWindow::new(WindowWidth::Bits16, 4).unwrap();
        assert_eq!(shard_from_key_in("test", window), 0x884c);
    }

    #[test]
    fn test_last_window_in_digest() {
        let window = ShardWindow::new(WindowWidth::Bits32, 28).unwrap();
        assert_eq!(shard_from_key_in("test", window), 0xb0f0_0a08);
    }

    #[test]
    fn test_window_past_digest_rejected() {
        assert_eq!(
            ShardWindow::new(WindowWidth::Bits32, 29),
            Err(FlexIdError::InvalidShardWindow {
                offset: 29,
                width: 32
            })
        );
        assert!(ShardWindow::new(WindowWidth::Bits16, 30).is_ok());
        assert!(ShardWindow::new(WindowWidth::Bits16, 31).is_err());
    }

    #[test]
    fn test_default_window() {
        let window = ShardWindow::default();
        assert_eq!(window.width(), WindowWidth::Bits32);
        assert_eq!(window.offset(), 0);
    }

    proptest! {
        #[test]
        fn prop_shard_from_key_deterministic(key in ".*") {
            prop_assert_eq!(shard_from_key(&key), shard_from_key(&key));
        }

        #[test]
        fn prop_sixteen_bit_window_fits(key in ".+", offset in 0usize..=30) {
            let window = ShardWindow::new(WindowWidth::Bits16, offset).unwrap();
            prop_assert!(shard_from_key_in(&key, window) <= u32::from(u16::MAX));
        }
    }
}
