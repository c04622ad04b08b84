use crate::checksum::checksum_validate;
use crate::clock::{Clock, SystemClock};
use crate::config::IdConfig;
use crate::error::{FlexIdError, Result};
use crate::hash::{ShardWindow, shard_from_key_in};
use crate::layout::BitLayout;
use jiff::Timestamp;
use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};

/// ID generator holding an epoch, a frozen layout, and the sequence counter.
///
/// The counter is the unit of collision avoidance: share one generator
/// between threads instead of building two with the same shard.
///
/// ```
/// use flexid::{IdConfig, IdGenerator, DEFAULT_EPOCH};
///
/// let generator = IdGenerator::new(IdConfig::new(DEFAULT_EPOCH).shard_bits(6))
///     .unwrap()
///     .with_shard(5);
/// let id = generator.generate();
/// assert_eq!(generator.extract_shard(id), 5);
/// assert_eq!(generator.extract_sequence(id), 0);
/// assert_eq!(generator.extract_sequence(generator.generate()), 1);
/// ```
#[derive(Debug)]
pub struct IdGenerator<C: Clock = SystemClock> {
    epoch: i64,
    layout: BitLayout,
    shard_window: ShardWindow,
    sequence: AtomicU32,
    shard: u32,
    constant: u32,
    clock: C,
}

impl IdGenerator<SystemClock> {
    /// Create a new generator backed by the system clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the field widths in `config` are invalid.
    pub fn new(config: IdConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> IdGenerator<C> {
    /// Create a new generator reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the field widths in `config` are invalid.
    pub fn with_clock(config: IdConfig, clock: C) -> Result<Self> {
        let layout = BitLayout::new(
            config.sequence_bits,
            config.shard_bits,
            config.constant_bits,
            config.check_bits,
        )?;

        let summary = layout.summary(config.epoch);
        tracing::info!(
            epoch = config.epoch,
            time_bits = layout.time_bits(),
            sequence_bits = layout.sequence_bits(),
            shard_bits = layout.shard_bits(),
            constant_bits = layout.constant_bits(),
            check_bits = layout.check_bits(),
            "{summary}"
        );
        if let Some(hook) = &config.on_layout {
            hook(&summary);
        }

        Ok(Self {
            epoch: config.epoch,
            layout,
            shard_window: config.shard_window,
            sequence: AtomicU32::new(0),
            shard: 0,
            constant: 0,
            clock,
        })
    }

    /// Sets the next sequence value.
    #[must_use]
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        *self.sequence.get_mut() = sequence;
        self
    }

    /// Sets the next sequence value from `rng`, so restarts do not replay from 0.
    #[must_use]
    pub fn with_random_sequence<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let sequence = rng.random();
        self.with_sequence(sequence)
    }

    /// Sets the shard used by [`generate`](Self::generate).
    #[must_use]
    pub const fn with_shard(mut self, shard: u32) -> Self {
        self.shard = shard;
        self
    }

    /// Sets the shard from `rng`, for callers with no natural partitioning.
    #[must_use]
    pub fn with_random_shard<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let shard = rng.random();
        self.with_shard(shard)
    }

    /// Sets the constant embedded in every generated ID.
    #[must_use]
    pub const fn with_constant(mut self, constant: u32) -> Self {
        self.constant = constant;
        self
    }

    #[must_use]
    pub const fn epoch(&self) -> i64 {
        self.epoch
    }

    #[must_use]
    pub const fn layout(&self) -> &BitLayout {
        &self.layout
    }

    /// The sequence value the next auto-incrementing call will use.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence.load(Ordering::Relaxed)
    }

    #[must_use]
    pub const fn shard(&self) -> u32 {
        self.shard
    }

    #[must_use]
    pub const fn constant(&self) -> u32 {
        self.constant
    }

    fn elapsed_millis(&self) -> i64 {
        self.clock.now().as_millisecond().wrapping_sub(self.epoch)
    }

    fn next_sequence(&self) -> u32 {
        // Wraps at 2^32, a multiple of every sequence field size.
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Generate an ID from the clock, the next sequence value, and the configured shard.
    #[must_use]
    pub fn generate(&self) -> i64 {
        self.generate_for_shard(self.shard)
    }

    /// Generate an ID from the clock, the next sequence value, and `shard`.
    #[must_use]
    pub fn generate_for_shard(&self, shard: u32) -> i64 {
        self.generate_with(self.next_sequence(), shard)
    }

    /// Generate an ID whose shard is derived from the SHA-256 digest of `key`.
    #[must_use]
    pub fn generate_for_key(&self, key: &str) -> i64 {
        self.generate_for_shard(self.shard_for_key(key))
    }

    /// Generate an ID from the clock with the given sequence and shard.
    ///
    /// The internal counter is left alone.
    #[must_use]
    pub fn generate_with(&self, sequence: u32, shard: u32) -> i64 {
        self.generate_from(self.elapsed_millis(), sequence, shard)
    }

    /// Generate an ID from raw millis, without adjusting for the epoch.
    ///
    /// Uses the configured constant; see [`generate_from_parts`](Self::generate_from_parts).
    #[must_use]
    pub fn generate_from(&self, raw_millis: i64, sequence: u32, shard: u32) -> i64 {
        self.generate_from_parts(raw_millis, sequence, shard, self.constant)
    }

    /// Generate an ID from raw millis and every field, including the constant.
    #[must_use]
    pub fn generate_from_parts(
        &self,
        raw_millis: i64,
        sequence: u32,
        shard: u32,
        constant: u32,
    ) -> i64 {
        self.layout.encode(raw_millis, sequence, shard, constant)
    }

    /// Shard value of `key` through the configured window, before truncation.
    #[must_use]
    pub fn shard_for_key(&self, key: &str) -> u32 {
        shard_from_key_in(key, self.shard_window)
    }

    /// Milliseconds since the Unix epoch at which `id` was generated.
    #[must_use]
    pub const fn extract_millis(&self, id: i64) -> i64 {
        self.layout.extract_millis(id).wrapping_add(self.epoch)
    }

    /// Instant at which `id` was generated.
    ///
    /// # Errors
    ///
    /// Returns `TimestampOutOfRange` if the instant cannot be represented.
    pub fn extract_timestamp(&self, id: i64) -> Result<Timestamp> {
        let millis = self.extract_millis(id);
        Timestamp::from_millisecond(millis).map_err(|_| FlexIdError::TimestampOutOfRange { millis })
    }

    #[must_use]
    pub const fn extract_sequence(&self, id: i64) -> u32 {
        self.layout.extract_sequence(id)
    }

    #[must_use]
    pub const fn extract_shard(&self, id: i64) -> u32 {
        self.layout.extract_shard(id)
    }

    /// The lowest `bits` bits of the shard of `id`.
    ///
    /// # Errors
    ///
    /// Returns `ShardBitsExceeded` if `bits` is wider than the shard field.
    pub const fn extract_shard_bits(&self, id: i64, bits: u8) -> Result<u32> {
        self.layout.extract_shard_bits(id, bits)
    }

    #[must_use]
    pub const fn extract_constant(&self, id: i64) -> u32 {
        self.layout.extract_constant(id)
    }

    #[must_use]
    pub const fn extract_check(&self, id: i64) -> u32 {
        self.layout.extract_check(id)
    }

    /// Returns false only if checksums are enabled and `id` fails validation.
    #[must_use]
    pub const fn is_valid(&self, id: i64) -> bool {
        !self.layout.has_checksum() || checksum_validate(id)
    }
}
