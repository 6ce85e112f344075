//! Text framing.
//!
//! A frame is one UTF-8 JSON object followed by a single record separator:
//! ```text
//! {"type":6}\x1e{"type":3,"invocationId":"1"}\x1e
//! ```
//! Frames concatenate with no other delimiter.

use bytes::Bytes;

/// Frame terminator (ASCII record separator).
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// Result of splitting a buffer on [`RECORD_SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitFrames {
    /// Complete frames in input order, terminators stripped.
    pub frames: Vec<Bytes>,
    /// Trailing bytes after the last terminator, if any.
    pub incomplete: Option<Bytes>,
}

/// Split `input` into terminated frames.
///
/// Frames are zero-copy slices of `input`. Empty frames (two adjacent
/// separators) are skipped.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hubwire::protocol::split_frames;
///
/// let split = split_frames(&Bytes::from_static(b"{\"type\":6}\x1e{\"ty"));
/// assert_eq!(split.frames, vec![Bytes::from_static(b"{\"type\":6}")]);
/// assert_eq!(split.incomplete, Some(Bytes::from_static(b"{\"ty")));
/// ```
pub fn split_frames(input: &Bytes) -> SplitFrames {
    let mut frames = Vec::new();
    let mut start = 0;

    for (index, &byte) in input.iter().enumerate() {
        if byte != RECORD_SEPARATOR {
            continue;
        }
        if index > start {
            frames.push(input.slice(start..index));
        }
        start = index + 1;
    }

    let incomplete = (start < input.len()).then(|| input.slice(start..));

    SplitFrames { frames, incomplete }
}

/// Position just past the last terminator, or `None` if there is none.
#[inline]
pub fn complete_prefix_len(input: &[u8]) -> Option<usize> {
    input
        .iter()
        .rposition(|&byte| byte == RECORD_SEPARATOR)
        .map(|index| index + 1)
}
