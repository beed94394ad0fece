// AQI tool variants and their validated invocations

use crate::catalog::{ParameterSpec, ToolDescriptor};
use crate::error::{AqiError, AqiResult};
use crate::upstream::UpstreamRequest;
use serde::Serialize;
use std::fmt;

/// Arguments as delivered by the protocol layer
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

const LOCATION: ParameterSpec = ParameterSpec::required_string("location", "縣市");
const STATION_OR_CITY: ParameterSpec =
    ParameterSpec::required_string("location", "測站或縣市名稱");
const DATE: ParameterSpec = ParameterSpec::required_string("date", "查詢日期，格式為 YYYY-MM-DD");

/// The four tools the gateway exposes.
///
/// Each variant owns its descriptor, its argument extraction and its
/// upstream request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiTool {
    /// Latest single reading for a city or station
    Query,
    /// Last 24 hours of readings; an empty location means nationwide
    QueryRecent,
    /// Static health guidance text
    HealthGuidance,
    /// Full-day readings for a station or city on a date
    QueryDaily,
}

impl AqiTool {
    /// Catalog order
    pub const ALL: [AqiTool; 4] = [
        AqiTool::Query,
        AqiTool::QueryRecent,
        AqiTool::HealthGuidance,
        AqiTool::QueryDaily,
    ];

    /// Identifier shared by the MCP catalog and the upstream API
    pub fn name(self) -> &'static str {
        match self {
            AqiTool::Query => "aqi-query",
            AqiTool::QueryRecent => "aqi-query-recent",
            AqiTool::HealthGuidance => "aqi-health-guidance",
            AqiTool::QueryDaily => "aqi-query-daily",
        }
    }

    /// Exact-match lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn descriptor(self) -> ToolDescriptor {
        match self {
            AqiTool::Query => ToolDescriptor {
                name: self.name(),
                description: "查詢該縣市或測站最新一筆空氣品質指數",
                parameters: &[LOCATION],
            },
            AqiTool::QueryRecent => ToolDescriptor {
                name: self.name(),
                description: "查詢該縣市最近 24 小時的空氣品質指數，不指定縣市(查詢全國)留空即可",
                parameters: &[LOCATION],
            },
            AqiTool::HealthGuidance => ToolDescriptor {
                name: self.name(),
                description: "提供各項空氣品質指數的健康建議",
                parameters: &[],
            },
            AqiTool::QueryDaily => ToolDescriptor {
                name: self.name(),
                description: "查詢指定日期和測站（或縣市）的整天空氣品質資料",
                parameters: &[STATION_OR_CITY, DATE],
            },
        }
    }

    /// Validate arguments into a typed call.
    ///
    /// Only presence is checked; values are forwarded as given.
    pub fn parse_arguments(self, arguments: &ToolArguments) -> AqiResult<AqiCall> {
        let call = match self {
            AqiTool::Query => AqiCall::Query {
                location: required_string(self, arguments, "location")?,
            },
            AqiTool::QueryRecent => AqiCall::QueryRecent {
                location: required_string(self, arguments, "location")?,
            },
            AqiTool::HealthGuidance => AqiCall::HealthGuidance,
            AqiTool::QueryDaily => AqiCall::QueryDaily {
                location: required_string(self, arguments, "location")?,
                date: required_string(self, arguments, "date")?,
            },
        };
        Ok(call)
    }
}

impl fmt::Display for AqiTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn required_string(tool: AqiTool, arguments: &ToolArguments, key: &str) -> AqiResult<String> {
    match arguments.get(key) {
        None | Some(serde_json::Value::Null) => Err(AqiError::missing_argument(tool.name(), key)),
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(AqiError::InvalidArgument {
            tool: tool.name().to_string(),
            argument: key.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AqiCall {
    Query { location: String },
    QueryRecent { location: String },
    HealthGuidance,
    QueryDaily { location: String, date: String },
}

#[derive(Serialize)]
struct DailyQuery<'a> {
    location: &'a str,
    date: &'a str,
}

impl AqiCall {
    pub fn tool(&self) -> AqiTool {
        match self {
            AqiCall::Query { .. } => AqiTool::Query,
            AqiCall::QueryRecent { .. } => AqiTool::QueryRecent,
            AqiCall::HealthGuidance => AqiTool::HealthGuidance,
            AqiCall::QueryDaily { .. } => AqiTool::QueryDaily,
        }
    }

    /// Build the form payload sent to the upstream API
    pub fn to_upstream_request(&self) -> AqiResult<UpstreamRequest> {
        let data = match self {
            AqiCall::Query { location } | AqiCall::QueryRecent { location } => location.clone(),
            AqiCall::HealthGuidance => String::new(),
            AqiCall::QueryDaily { location, date } => {
                serde_json::to_string(&DailyQuery { location, date })?
            }
        };

        Ok(UpstreamRequest::new(self.tool().name(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> ToolArguments {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    #[test]
    fn test_from_name_round_trips_every_tool() {
        for tool in AqiTool::ALL {
            assert_eq!(AqiTool::from_name(tool.name()), Some(tool));
            assert_eq!(tool.descriptor().name, tool.name());
        }
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(AqiTool::from_name("AQI-QUERY"), None);
        assert_eq!(AqiTool::from_name("aqi-query "), None);
        assert_eq!(AqiTool::from_name(""), None);
    }

    #[test]
    fn test_query_request() {
        let call = AqiTool::Query
            .parse_arguments(&args(json!({"location": "台北"})))
            .unwrap();
        let request = call.to_upstream_request().unwrap();

        assert_eq!(request, UpstreamRequest::new("aqi-query", "台北"));
    }

    #[test]
    fn test_query_recent_allows_empty_location() {
        let call = AqiTool::QueryRecent
            .parse_arguments(&args(json!({"location": ""})))
            .unwrap();
        let request = call.to_upstream_request().unwrap();

        assert_eq!(request, UpstreamRequest::new("aqi-query-recent", ""));
    }

    #[test]
    fn test_daily_request_encodes_json_in_key_order() {
        let call = AqiTool::QueryDaily
            .parse_arguments(&args(json!({"date": "2024-05-01", "location": "台中"})))
            .unwrap();
        let request = call.to_upstream_request().unwrap();

        assert_eq!(request.tool, "aqi-query-daily");
        assert_eq!(request.data, r#"{"location":"台中","date":"2024-05-01"}"#);
    }

    #[test]
    fn test_health_guidance_ignores_arguments() {
        let call = AqiTool::HealthGuidance
            .parse_arguments(&args(json!({"location": "高雄", "extra": 42})))
            .unwrap();

        assert_eq!(call, AqiCall::HealthGuidance);
        assert_eq!(
            call.to_upstream_request().unwrap(),
            UpstreamRequest::new("aqi-health-guidance", "")
        );
    }

    #[test]
    fn test_missing_location() {
        let err = AqiTool::Query.parse_arguments(&ToolArguments::new()).unwrap_err();

        assert!(err.is_request_error());
        assert!(matches!(
            err,
            AqiError::MissingArgument { ref tool, ref argument }
                if tool == "aqi-query" && argument == "location"
        ));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = AqiTool::QueryRecent
            .parse_arguments(&args(json!({"location": null})))
            .unwrap_err();

        assert!(matches!(err, AqiError::MissingArgument { .. }));
    }

    #[test]
    fn test_daily_missing_date() {
        let err = AqiTool::QueryDaily
            .parse_arguments(&args(json!({"location": "台中"})))
            .unwrap_err();

        assert!(matches!(
            err,
            AqiError::MissingArgument { ref argument, .. } if argument == "date"
        ));
    }

    #[test]
    fn test_non_string_argument_rejected() {
        let err = AqiTool::Query
            .parse_arguments(&args(json!({"location": 101})))
            .unwrap_err();

        assert!(err.is_request_error());
        assert!(matches!(err, AqiError::InvalidArgument { .. }));
    }

    #[test]
    fn test_call_reports_its_tool() {
        assert_eq!(AqiCall::HealthGuidance.tool(), AqiTool::HealthGuidance);
        assert_eq!(
            AqiCall::QueryDaily {
                location: "x".into(),
                date: "y".into()
            }
            .tool(),
            AqiTool::QueryDaily
        );
    }
}
