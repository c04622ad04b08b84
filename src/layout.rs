use crate::checksum::checksum_encode;
use crate::error::{FlexIdError, Result};
use jiff::Timestamp;
use std::fmt;

/// Widest sequence, shard, or constant field.
pub const MAX_FIELD_BITS: u8 = 15;

/// Width of the checksum field when it is enabled.
pub const CHECK_BITS: u8 = 4;

/// Bits available below the sign bit.
const ID_BITS: u8 = 63;

const MILLIS_PER_YEAR: u64 = 1000 * 60 * 60 * 24 * 365;

const fn mask(bits: u8) -> i64 {
    (1 << bits) - 1
}

/// Field widths of an ID, most significant first: time, sequence, shard, constant, check.
///
/// A layout is validated once and never changes, so any holder of an ID and
/// the same layout can decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitLayout {
    time_bits: u8,
    sequence_bits: u8,
    shard_bits: u8,
    constant_bits: u8,
    check_bits: u8,
    sequence_mask: i64,
    shard_mask: i64,
    constant_mask: i64,
    check_mask: i64,
}

impl BitLayout {
    /// Validates the field widths and derives the time width from what is left.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a sequence, shard, or constant width is
    /// above 15, if `check_bits` is neither 0 nor 4, or if the fields together
    /// exceed 63 bits.
    pub const fn new(
        sequence_bits: u8,
        shard_bits: u8,
        constant_bits: u8,
        check_bits: u8,
    ) -> Result<Self> {
        if sequence_bits > MAX_FIELD_BITS {
            return Err(FlexIdError::InvalidSequenceBits {
                bits: sequence_bits,
            });
        }
        if shard_bits > MAX_FIELD_BITS {
            return Err(FlexIdError::InvalidShardBits { bits: shard_bits });
        }
        if constant_bits > MAX_FIELD_BITS {
            return Err(FlexIdError::InvalidConstantBits {
                bits: constant_bits,
            });
        }
        if check_bits != 0 && check_bits != CHECK_BITS {
            return Err(FlexIdError::InvalidCheckBits { bits: check_bits });
        }

        let total = sequence_bits + shard_bits + constant_bits + check_bits;
        if total > ID_BITS {
            return Err(FlexIdError::BitBudgetExceeded { total });
        }

        Ok(Self {
            time_bits: ID_BITS - total,
            sequence_bits,
            shard_bits,
            constant_bits,
            check_bits,
            sequence_mask: mask(sequence_bits),
            shard_mask: mask(shard_bits),
            constant_mask: mask(constant_bits),
            check_mask: mask(check_bits),
        })
    }

    #[must_use]
    pub const fn time_bits(&self) -> u8 {
        self.time_bits
    }

    #[must_use]
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    #[must_use]
    pub const fn shard_bits(&self) -> u8 {
        self.shard_bits
    }

    #[must_use]
    pub const fn constant_bits(&self) -> u8 {
        self.constant_bits
    }

    #[must_use]
    pub const fn check_bits(&self) -> u8 {
        self.check_bits
    }

    #[must_use]
    pub const fn has_checksum(&self) -> bool {
        self.check_bits == CHECK_BITS
    }

    const fn constant_shift(&self) -> u8 {
        self.check_bits
    }

    const fn shard_shift(&self) -> u8 {
        self.constant_shift() + self.constant_bits
    }

    const fn sequence_shift(&self) -> u8 {
        self.shard_shift() + self.shard_bits
    }

    const fn time_shift(&self) -> u8 {
        self.sequence_shift() + self.sequence_bits
    }

    /// Packs the fields into an ID.
    ///
    /// `sequence`, `shard`, and `constant` are masked to their widths, so
    /// out-of-range values wrap instead of failing. `raw_millis` is shifted
    /// unmasked: a value wider than [`time_bits`](Self::time_bits) spills into
    /// the sign bit or is lost.
    #[must_use]
    pub fn encode(&self, raw_millis: i64, sequence: u32, shard: u32, constant: u32) -> i64 {
        let id = (raw_millis << self.time_shift())
            | ((i64::from(sequence) & self.sequence_mask) << self.sequence_shift())
            | ((i64::from(shard) & self.shard_mask) << self.shard_shift())
            | ((i64::from(constant) & self.constant_mask) << self.constant_shift());
        if self.has_checksum() {
            checksum_encode(id)
        } else {
            id
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    const fn field(id: i64, shift: u8, mask: i64) -> u32 {
        ((id >> shift) & mask) as u32
    }

    /// Milliseconds since the epoch. Negative IDs decode to negative millis.
    #[must_use]
    pub const fn extract_millis(&self, id: i64) -> i64 {
        id >> self.time_shift()
    }

    #[must_use]
    pub const fn extract_sequence(&self, id: i64) -> u32 {
        Self::field(id, self.sequence_shift(), self.sequence_mask)
    }

    #[must_use]
    pub const fn extract_shard(&self, id: i64) -> u32 {
        Self::field(id, self.shard_shift(), self.shard_mask)
    }

    /// The lowest `bits` bits of the shard field.
    ///
    /// Maps a large logical shard space onto a smaller physical one.
    ///
    /// # Errors
    ///
    /// Returns `ShardBitsExceeded` if `bits` is wider than the shard field.
    pub const fn extract_shard_bits(&self, id: i64, bits: u8) -> Result<u32> {
        if bits > self.shard_bits {
            return Err(FlexIdError::ShardBitsExceeded {
                requested: bits,
                configured: self.shard_bits,
            });
        }
        Ok(Self::field(id, self.shard_shift(), mask(bits)))
    }

    #[must_use]
    pub const fn extract_constant(&self, id: i64) -> u32 {
        Self::field(id, self.constant_shift(), self.constant_mask)
    }

    #[must_use]
    pub const fn extract_check(&self, id: i64) -> u32 {
        Self::field(id, 0, self.check_mask)
    }

    /// Describes the range and cardinalities this layout allows from `epoch_ms`.
    #[must_use]
    pub fn summary(&self, epoch_ms: i64) -> LayoutSummary {
        let range_ms = 1_u64 << self.time_bits;
        let end = i64::try_from(range_ms)
            .ok()
            .and_then(|range| epoch_ms.checked_add(range))
            .and_then(|millis| Timestamp::from_millisecond(millis).ok());

        LayoutSummary {
            time_range_years: range_ms / MILLIS_PER_YEAR,
            start: Timestamp::from_millisecond(epoch_ms).ok(),
            end,
            sequences: 1 << self.sequence_bits,
            shards: 1 << self.shard_bits,
            constants: 1 << self.constant_bits,
            check_bits: self.check_bits,
        }
    }
}

/// Range and cardinalities of a layout, reported when a generator is built.
///
/// `start` or `end` is `None` when the instant falls outside the calendar range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSummary {
    pub time_range_years: u64,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub sequences: u32,
    pub shards: u32,
    pub constants: u32,
    pub check_bits: u8,
}

struct Bound(Option<Timestamp>);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ts) => write!(f, "{ts}"),
            None => write!(f, "out of range"),
        }
    }
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ids have a time range of {} years ({} to {}), {} sequences, {} shards, {} constants",
            self.time_range_years,
            Bound(self.start),
            Bound(self.end),
            self.sequences,
            self.shards,
            self.constants,
        )?;
        if self.check_bits > 0 {
            write!(f, ", {}-bit checksum", self.check_bits)?;
        }
        Ok(())
    }
}
