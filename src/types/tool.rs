use thiserror::Error;

pub trait Tool {
    type Context;
    fn apply(&self, context: &Self::Context) -> Result<String, ToolError>;
}

/// Failures raised by a handler. They are reported back to the model as
/// the tool's output, never as a fault of the turn.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid unit '{0}'. Must be 'Celsius' or 'Fahrenheit'.")]
    InvalidUnit(String),
}
