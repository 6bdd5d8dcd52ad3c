//! Test helpers shared across Quill crates.

pub mod clock;
pub mod llm;
pub mod vault;

pub use clock::FixedClock;
pub use llm::{FailingCompletion, FixedCompletion, RecordingCompletion};
pub use vault::MemoryVault;
