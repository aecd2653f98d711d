use std::collections::HashMap;

use crate::{PromptError, PromptTemplate};

/// Retrieval-QA "stuff" prompt: every retrieved chunk is placed in the
/// context, followed by the question.
pub const STUFF_TEMPLATE: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
{{context}}\n\n\
Question: {{question}}\n\
Helpful Answer:";

const CHUNK_SEPARATOR: &str = "\n\n";

/// Builds the prompt that grounds an answer in retrieved chunks.
#[derive(Debug, Clone)]
pub struct GroundingPrompt {
    template: PromptTemplate,
}

impl Default for GroundingPrompt {
    fn default() -> Self {
        Self {
            template: PromptTemplate::new(STUFF_TEMPLATE),
        }
    }
}

impl GroundingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom template; it must reference `{{context}}` and
    /// `{{question}}`.
    pub fn with_template(template: PromptTemplate) -> Result<Self, PromptError> {
        let variables = template.variables()?;
        for required in ["context", "question"] {
            if !variables.contains(required) {
                return Err(PromptError::MissingVariable(required.to_string()));
            }
        }
        Ok(Self { template })
    }

    pub fn build<'a, I>(&self, question: &str, contexts: I) -> Result<String, PromptError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let context = contexts
            .into_iter()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);
        let vars = HashMap::from([("context", context), ("question", question.trim().to_string())]);
        self.template.render(&vars)
    }
}
