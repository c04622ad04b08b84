#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlexIdError {
    #[error("invalid sequence bits {bits}; expected 0..=15")]
    InvalidSequenceBits { bits: u8 },

    #[error("invalid shard bits {bits}; expected 0..=15")]
    InvalidShardBits { bits: u8 },

    #[error("invalid constant bits {bits}; expected 0..=15")]
    InvalidConstantBits { bits: u8 },

    #[error("invalid check bits {bits}; expected 0 or 4")]
    InvalidCheckBits { bits: u8 },

    #[error("field widths use {total} bits; at most 63 are available")]
    BitBudgetExceeded { total: u8 },

    #[error("shard window of {width} bits at byte offset {offset} does not fit a 32-byte digest")]
    InvalidShardWindow { offset: usize, width: u8 },

    #[error("requested {requested} shard bits, but only {configured} are configured")]
    ShardBitsExceeded { requested: u8, configured: u8 },

    #[error("timestamp out of range: {millis} ms since the Unix epoch")]
    TimestampOutOfRange { millis: i64 },
}

impl FlexIdError {
    /// Returns true for errors raised while validating an [`IdConfig`](crate::IdConfig).
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidSequenceBits { .. }
                | Self::InvalidShardBits { .. }
                | Self::InvalidConstantBits { .. }
                | Self::InvalidCheckBits { .. }
                | Self::BitBudgetExceeded { .. }
                | Self::InvalidShardWindow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FlexIdError>;
