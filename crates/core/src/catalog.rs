// Static tool catalog advertised to MCP clients

use crate::tool::AqiTool;
use serde::Serialize;

/// One input parameter of a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: &'static str,
    pub description: &'static str,
    pub required: bool,
}

impl ParameterSpec {
    pub const fn required_string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            param_type: "string",
            description,
            required: true,
        }
    }
}

/// Immutable description of a callable tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterSpec],
}

impl ToolDescriptor {
    /// Names of the parameters a caller must supply
    pub fn required_parameters(&self) -> Vec<&'static str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }

    /// Render the parameters as a JSON Schema object
    pub fn input_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    serde_json::json!({
                        "type": p.param_type,
                        "description": p.description
                    }),
                )
            })
            .collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required_parameters()
        })
    }
}

/// All tools in advertised order.
///
/// Derived from [`AqiTool::ALL`], so every listed tool has a dispatch arm.
pub fn catalog() -> Vec<ToolDescriptor> {
    AqiTool::ALL.iter().map(|tool| tool.descriptor()).collect()
}
