mod grounding;
mod template;

pub use grounding::{GroundingPrompt, STUFF_TEMPLATE};
pub use template::{PromptError, PromptTemplate};
