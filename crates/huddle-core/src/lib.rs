//! Query-to-answer pipeline for the Huddle workspace assistant.
//!
//! The [`Assistant`] classifies a question, retrieves workspace content with
//! fallback chains, assembles a uniform context block, calls the response
//! generator, derives sources and navigation actions from the retrieved
//! records, and records the exchange in the participant's history.

pub mod classifier;
pub mod clock;
pub mod context;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod postprocess;
pub mod prompt;
pub mod retrieval;

pub use classifier::{QueryClassifier, classify};
pub use clock::{Clock, SystemClock};
pub use context::assemble_context;
pub use error::HuddleCoreError;
pub use extract::{NO_DESCRIPTION, extract_snippet};
pub use pipeline::{Assistant, Collaborators};
pub use postprocess::{PostProcessor, derive_actions};
pub use prompt::{PromptBuilder, PromptInput};
pub use retrieval::{Retrieval, RetrievalOrchestrator};
