mod registry;

pub use registry::{ToolCallError, ToolRegistry};
