use crate::Result;
use crate::context::InvocationContext;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Option<Value> {
        None
    }
    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
}

/// Invocation view plus the identity of the function call being served.
pub trait ToolContext: InvocationContext {
    fn function_call_id(&self) -> &str;
}
