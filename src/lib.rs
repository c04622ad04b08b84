//! Coordinator-free, time-sortable 64-bit IDs.
//!
//! An ID packs, from the most significant bit down, the milliseconds since an
//! epoch, a per-generator sequence counter, a shard, an optional constant,
//! and an optional Luhn-16 check nibble. The sign bit stays clear while the
//! time field is within its range.

pub mod checksum;
pub mod clock;
pub mod config;
pub mod error;
pub mod generate;
pub mod hash;
pub mod layout;

pub use checksum::{checksum_encode, checksum_validate};
pub use clock::{Clock, SystemClock};
pub use config::{DEFAULT_EPOCH, INSTAGRAM_EPOCH, IdConfig, UNIX_EPOCH};
pub use error::{FlexIdError, Result};
pub use generate::IdGenerator;
pub use hash::{ShardWindow, WindowWidth, shard_from_key, shard_from_key_in};
pub use layout::{BitLayout, LayoutSummary};
