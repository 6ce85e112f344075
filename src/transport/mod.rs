//! Transport adapters - async reading and writing of hub messages.

mod stream;

pub use stream::{MessageReader, MessageWriter};
