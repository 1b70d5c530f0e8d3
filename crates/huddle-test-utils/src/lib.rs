//! Test helpers shared across Huddle crates.

pub mod clock;
pub mod generator;
pub mod history;
pub mod members;
pub mod retrieval;
pub mod tools;

pub use clock::FixedClock;
pub use generator::{FailingGenerator, FixedGenerator, RecordingGenerator};
pub use history::FlakyDocumentStore;
pub use members::StaticMembers;
pub use retrieval::{StubCalendar, StubSearch};
pub use tools::{FailingTool, FixedTool};
