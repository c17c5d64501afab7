//! arcpack core: archive pack/unpack engine
//!
//! Format tags are detected from file name suffixes, each format maps to a
//! codec adapter through a single dispatch, and extraction finishes with a
//! layout normalization pass that consolidates scattered top-level entries.

pub mod capability;
pub mod codec;
pub mod error;
pub mod format;
pub mod layout;
pub mod pack;
pub mod unpack;

pub use error::{Error, Result};
pub use format::{base_prefix, detect_format, ArchiveFormat};
pub use layout::normalize_layout;
pub use pack::pack;
pub use unpack::{unpack, unpack_into};
