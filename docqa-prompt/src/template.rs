use std::collections::{BTreeSet, HashMap};

use docqa_core::DocqaError;
use regex::Regex;
use thiserror::Error;

const VARIABLE_PATTERN: &str = r"\{\{\s*(\w+)\s*\}\}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error("missing template variable '{0}'")]
    MissingVariable(String),
}

impl From<PromptError> for DocqaError {
    fn from(err: PromptError) -> Self {
        DocqaError::InvalidConfiguration(err.to_string())
    }
}

/// A `{{var}}` template. Substituted values are inserted verbatim and never
/// re-expanded.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn pattern() -> Result<Regex, PromptError> {
        Regex::new(VARIABLE_PATTERN).map_err(|e| PromptError::InvalidTemplate(e.to_string()))
    }

    /// Variable names referenced by the template, sorted.
    pub fn variables(&self) -> Result<BTreeSet<String>, PromptError> {
        let pattern = Self::pattern()?;
        Ok(pattern
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .collect())
    }

    pub fn render(&self, vars: &HashMap<&str, String>) -> Result<String, PromptError> {
        if let Some(missing) = self
            .variables()?
            .into_iter()
            .find(|name| !vars.contains_key(name.as_str()))
        {
            return Err(PromptError::MissingVariable(missing));
        }
        let pattern = Self::pattern()?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}
