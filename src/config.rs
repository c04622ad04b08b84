use crate::hash::ShardWindow;
use crate::layout::LayoutSummary;
use std::fmt;
use std::sync::Arc;

/// 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH: i64 = 0;
/// 2015-01-01T00:00:00Z.
pub const DEFAULT_EPOCH: i64 = 1_420_070_400_000;
/// 2011-01-01T00:00:00Z.
pub const INSTAGRAM_EPOCH: i64 = 1_293_840_000_000;

pub type LayoutHook = Arc<dyn Fn(&LayoutSummary) + Send + Sync>;

#[derive(Clone)]
pub struct IdConfig {
    pub epoch: i64,
    pub sequence_bits: u8,
    pub shard_bits: u8,
    pub constant_bits: u8,
    pub check_bits: u8,
    pub shard_window: ShardWindow,
    pub on_layout: Option<LayoutHook>,
}

impl IdConfig {
    /// Starts a config counting time from `epoch`, in milliseconds since the Unix epoch.
    ///
    /// Defaults to 8 sequence bits and 8 shard bits, leaving 47 bits of time.
    #[must_use]
    pub fn new(epoch: i64) -> Self {
        Self {
            epoch,
            sequence_bits: 8,
            shard_bits: 8,
            constant_bits: 0,
            check_bits: 0,
            shard_window: ShardWindow::default(),
            on_layout: None,
        }
    }

    #[must_use]
    pub const fn sequence_bits(mut self, bits: u8) -> Self {
        self.sequence_bits = bits;
        self
    }

    #[must_use]
    pub const fn shard_bits(mut self, bits: u8) -> Self {
        self.shard_bits = bits;
        self
    }

    #[must_use]
    pub const fn constant_bits(mut self, bits: u8) -> Self {
        self.constant_bits = bits;
        self
    }

    /// 0 disables the checksum, 4 enables it.
    #[must_use]
    pub const fn check_bits(mut self, bits: u8) -> Self {
        self.check_bits = bits;
        self
    }

    #[must_use]
    pub const fn shard_window(mut self, window: ShardWindow) -> Self {
        self.shard_window = window;
        self
    }

    /// Registers a callback that receives the layout summary when a generator is built.
    #[must_use]
    pub fn on_layout<F>(mut self, hook: F) -> Self
    where
        F: Fn(&LayoutSummary) + Send + Sync + 'static,
    {
        self.on_layout = Some(Arc::new(hook));
        self
    }
}

impl Default for IdConfig {
    fn default() -> Self {
        Self::new(UNIX_EPOCH)
    }
}

impl fmt::Debug for IdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdConfig")
            .field("epoch", &self.epoch)
            .field("sequence_bits", &self.sequence_bits)
            .field("shard_bits", &self.shard_bits)
            .field("constant_bits", &self.constant_bits)
            .field("check_bits", &self.check_bits)
            .field("shard_window", &self.shard_window)
            .field("on_layout", &self.on_layout.is_some())
            .finish()
    }
}
