pub mod provider;
pub mod providers;
pub mod synthesizer;

pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
pub use synthesizer::{AnswerSynthesizer, SynthesisError, SynthesisSettings};
