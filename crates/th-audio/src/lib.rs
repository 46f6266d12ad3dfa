//! Audio output sinks for the theremin.

mod cpal_backend;
mod memory;
mod traits;

pub use cpal_backend::CpalOutput;
pub use memory::MemorySink;
pub use traits::{AudioError, AudioSink};
