//! Reply segmentation and paced delivery.
//!
//! A backend's raw reply is split into ordered prose and media segments,
//! then sent through the channel one message at a time with a typing
//! indicator held for a length-proportional delay.

pub mod scheduler;
pub mod segment;

pub use {
    scheduler::{Deliverer, MAX_DELAY_MS, MIN_DELAY_MS},
    segment::{Segment, classify_media_url, segment},
};
