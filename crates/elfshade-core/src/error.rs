//! Error types for elfshade-core

use thiserror::Error;

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring the kernel.
///
/// Distance evaluation and marching never fail; only configuration can.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Control channel outside the bank
    #[error("Control channel {channel} out of range (bank has {len} channels)")]
    ChannelOutOfRange { channel: usize, len: usize },
}
