//! Protocol module - text framing.
//!
//! - Record-separator terminated frames
//! - Frame splitting with partial-tail detection
//! - Frame buffer for accumulating partial reads

mod frame_buffer;
mod wire_format;

pub use frame_buffer::{FrameBuffer, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_BUFFERED};
pub use wire_format::{complete_prefix_len, split_frames, SplitFrames, RECORD_SEPARATOR};
