//! Interactive prompting for parameters that have no explicit value.
//!
//! The finalizer decides *what* to ask; a `Prompter` decides *how*.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};
use mcc_common::Error;
use mcc_config::{PromptAnswers, PromptRequest, Value, ValueKind};
use tracing::debug;

/// Source of prompt answers.
pub trait Prompter {
    /// Ask every request, in order, and return the answers by parameter name.
    fn ask(&mut self, requests: &[PromptRequest]) -> Result<PromptAnswers, Error>;
}

/// Terminal prompts via dialoguer. The resolved value is offered as the default.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        DialoguerPrompter {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask_one(&self, request: &PromptRequest) -> Result<Option<Value>, dialoguer::Error> {
        let label = format!("{} ({})", request.description, request.name);

        if request.sensitive {
            let answer = Password::with_theme(&self.theme)
                .with_prompt(label)
                .allow_empty_password(true)
                .interact()?;
            return Ok(non_empty(answer).map(Value::String));
        }

        match request.kind {
            ValueKind::Bool => {
                let default = request
                    .default
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let answer = Confirm::with_theme(&self.theme)
                    .with_prompt(label)
                    .default(default)
                    .interact()?;
                Ok(Some(Value::Bool(answer)))
            }
            ValueKind::String | ValueKind::List => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(label)
                    .allow_empty(true);
                if let Some(default) = request.default.as_ref().and_then(display_default) {
                    input = input.default(default);
                }
                let answer = input.interact_text()?;
                // Lists are entered comma separated and coerced by the finalizer.
                Ok(non_empty(answer).map(Value::String))
            }
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&mut self, requests: &[PromptRequest]) -> Result<PromptAnswers, Error> {
        let mut answers = PromptAnswers::new();
        for request in requests {
            let answer = self
                .ask_one(request)
                .map_err(|e| Error::Prompt(format!("{}: {}", request.name, e)))?;
            if let Some(answer) = answer {
                debug!(parameter = %request.name, "prompt answered");
                answers.insert(request.name.clone(), answer);
            }
        }
        Ok(answers)
    }
}

/// Never asks anything. Used with `--skip-prompts` and when stdin is not a terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn ask(&mut self, _requests: &[PromptRequest]) -> Result<PromptAnswers, Error> {
        Ok(PromptAnswers::new())
    }
}

/// Answers from a prepared map, for scripted runs.
///
/// Only requested parameters are answered; the rest of the map is ignored.
#[derive(Debug, Default, Clone)]
pub struct FixedPrompter {
    answers: PromptAnswers,
    asked: Vec<String>,
}

impl FixedPrompter {
    pub fn new(answers: PromptAnswers) -> Self {
        FixedPrompter {
            answers,
            asked: Vec::new(),
        }
    }

    /// Parameter names that were requested, across all calls.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for FixedPrompter {
    fn ask(&mut self, requests: &[PromptRequest]) -> Result<PromptAnswers, Error> {
        let mut answers = PromptAnswers::new();
        for request in requests {
            self.asked.push(request.name.clone());
            if let Some(answer) = self.answers.get(&request.name) {
                answers.insert(request.name.clone(), answer.clone());
            }
        }
        Ok(answers)
    }
}

fn non_empty(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn display_default(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
