//! Sender-side flow control core for a reliable UDP publish/subscribe
//! driver.
//!
//! Each publication maintains a send limit: the highest stream position its
//! sender may transmit to. Receivers periodically report their consumed
//! position and receiver window in Status Messages; this crate turns those
//! reports (and periodic idle ticks) into an updated send limit, via one of
//! three pluggable strategies -- [`strategy::max`], [`strategy::min`], and
//! [`strategy::preferred`] -- selected per publication from the channel
//! URI's `fc` parameter (see [`registry::select_default_multicast_strategy`]).
//!
//! Congestion control, retransmission, NAK handling, and multicast group
//! membership are out of scope: this is flow control over already-
//! acknowledged receiver progress, nothing more.

pub mod clock;
pub mod config;
pub mod error;
pub mod options;
pub mod position;
pub mod receiver_table;
pub mod registry;
pub mod status_message;
pub mod strategy;

pub use clock::NanoTimestamp;
pub use error::{FlowControlError, NotFound};
pub use options::{parse_preferred_options, FlowControlOptions};
pub use registry::select_default_multicast_strategy;
pub use status_message::StatusMessageHeader;
pub use strategy::Strategy;
