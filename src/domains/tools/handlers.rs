//! Tool handler trait.
//!
//! Every document tool has the same shape: typed parameters deserialized from
//! the call arguments, a synchronous body that either produces a result or a
//! [`ToolError`], and a JSON envelope returned to the client. [`DocxTool`]
//! captures the body; the provided methods supply the rmcp route, the HTTP
//! handler and the envelope so tool files only implement `run`.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Content, Tool},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ErrorCode, ToolError, success_envelope};
use crate::core::config::Config;

/// A document tool exposed over MCP.
pub trait DocxTool {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Arguments accepted by the tool.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Payload placed under `result` on success.
    type Output: Serialize;

    /// Validate, open, mutate, save and report.
    fn run(params: Self::Params, config: &Config) -> Result<Self::Output, ToolError>;

    /// Deserialize `arguments` and run the tool, producing the envelope.
    ///
    /// A panic inside `run` is reported as `UNEXPECTED_ERROR` instead of
    /// unwinding into the transport.
    fn invoke(arguments: Value, config: &Config) -> Result<Value, ToolError> {
        let params: Self::Params = serde_json::from_value(arguments).map_err(|e| {
            ToolError::new(
                ErrorCode::InvalidArguments,
                format!("Invalid arguments for {}: {}", Self::NAME, e),
            )
        })?;

        let output = catch_unwind(AssertUnwindSafe(|| Self::run(params, config)))
            .map_err(|payload| ToolError::new(ErrorCode::UnexpectedError, panic_message(payload)))??;

        serde_json::to_value(output)
            .map_err(|e| ToolError::new(ErrorCode::UnexpectedError, e.to_string()))
    }

    /// Run the tool and wrap the outcome for MCP.
    fn call(arguments: Value, config: &Config) -> CallToolResult {
        match Self::invoke(arguments, config) {
            Ok(result) => {
                debug!("{} succeeded", Self::NAME);
                CallToolResult::success(vec![Content::text(render(&success_envelope(result)))])
            }
            Err(error) => {
                warn!("{} failed: {}", Self::NAME, error);
                CallToolResult::error(vec![Content::text(render(&error.to_envelope()))])
            }
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    fn http_handler(arguments: Value, config: Arc<Config>) -> Result<Value, String> {
        let result = Self::call(arguments, &config);
        Ok(serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        }))
    }

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO transport.
    fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
        Self: Sized + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move { Ok::<_, McpError>(Self::call(Value::Object(args), &config)) }.boxed()
        })
    }
}

fn render(envelope: &Value) -> String {
    serde_json::to_string_pretty(envelope).unwrap_or_else(|_| envelope.to_string())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool panicked".to_string()
    }
}

/// Extract the envelope from a tool result's text content.
#[cfg(test)]
pub(crate) fn envelope_of(result: &CallToolResult) -> Value {
    let text = match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    };
    serde_json::from_str(text).unwrap()
}
