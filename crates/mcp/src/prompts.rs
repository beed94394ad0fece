// Static prompt templates

use crate::protocol::{
    GetPromptParams, GetPromptResult, JsonRpcError, PromptArgument, PromptMessage, PromptSchema,
    Role, ToolContent,
};

/// An immutable prompt template
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub argument: &'static str,
    pub argument_description: &'static str,
}

/// The one demo prompt this server ships with
pub const EXAMPLE_PROMPT: PromptTemplate = PromptTemplate {
    name: "example-prompt",
    description: "An example prompt template",
    argument: "arg1",
    argument_description: "Example argument",
};

impl PromptTemplate {
    pub fn schema(&self) -> PromptSchema {
        PromptSchema {
            name: self.name.to_string(),
            description: self.description.to_string(),
            arguments: vec![PromptArgument {
                name: self.argument.to_string(),
                description: self.argument_description.to_string(),
                required: true,
            }],
        }
    }

    /// Render the prompt.
    ///
    /// No arguments object renders as `none`; an object without the
    /// argument renders it empty.
    pub fn render(&self, arguments: Option<&serde_json::Map<String, serde_json::Value>>) -> GetPromptResult {
        let value = match arguments.map(|args| args.get(self.argument)) {
            None => "none".to_string(),
            Some(None) | Some(Some(serde_json::Value::Null)) => String::new(),
            Some(Some(serde_json::Value::String(s))) => s.clone(),
            Some(Some(other)) => other.to_string(),
        };

        GetPromptResult {
            description: "Example prompt".to_string(),
            messages: vec![PromptMessage {
                role: Role::User,
                content: ToolContent::text(format!("Example prompt text with argument: {}", value)),
            }],
        }
    }
}

/// Fixed set of prompts
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    prompts: Vec<PromptTemplate>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self {
            prompts: vec![EXAMPLE_PROMPT],
        }
    }

    pub fn list_schemas(&self) -> Vec<PromptSchema> {
        self.prompts.iter().map(PromptTemplate::schema).collect()
    }

    pub fn get(&self, params: &GetPromptParams) -> Result<GetPromptResult, JsonRpcError> {
        self.prompts
            .iter()
            .find(|p| p.name == params.name)
            .map(|p| p.render(params.arguments.as_ref()))
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown prompt: {}", params.name)))
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}
