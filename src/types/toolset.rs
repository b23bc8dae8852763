use super::tool_object::{ToolObject, ValidationError};
use super::{Tool, ToolError};
use async_openai::types::AssistantTools;
use schemars::JsonSchema;
use serde::de::Deserialize;
use std::collections::hash_map::HashMap;
use thiserror::Error;

pub struct ToolSet<C> {
    tools: HashMap<String, ToolObject<C>>,
}

#[derive(Debug, Error)]
pub enum ToolSetCreationError {
    #[error("error validating schema")]
    Validation(#[source] ValidationError),
    #[error("two or more tools are named `{0}`")]
    NameConflict(String),
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("error deserializing tool call (possible hallucination)")]
    Deserialization(#[source] serde_json::Error),
    #[error("tool `{0}` not in toolset")]
    NotFound(String),
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl<C> Default for ToolSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ToolSet<C> {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn add_tool<T>(mut self) -> Result<Self, ToolSetCreationError>
    where
        T: JsonSchema + Tool<Context = C> + for<'de> Deserialize<'de> + Send + Sync + 'static,
    {
        let tool_object =
            ToolObject::try_from_tool::<T>().map_err(ToolSetCreationError::Validation)?;
        if self.tools.contains_key(&tool_object.name) {
            Err(ToolSetCreationError::NameConflict(tool_object.name.clone()))
        } else {
            self.tools.insert(tool_object.name.clone(), tool_object);
            Ok(self)
        }
    }

    pub fn lookup(&self, tool_name: &str) -> Result<&ToolObject<C>, ToolCallError> {
        self.tools
            .get(tool_name)
            .ok_or_else(|| ToolCallError::NotFound(tool_name.to_owned()))
    }

    pub fn try_tool_call(
        &self,
        context: &C,
        tool_name: &str,
        json: &str,
    ) -> Result<String, ToolCallError> {
        let tool = self.lookup(tool_name).and_then(|tool| {
            tool.try_deserialize(json)
                .map_err(ToolCallError::Deserialization)
        })?;
        Ok(tool.apply(context)?)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Function tool definitions for assistant creation, ordered by name.
    pub fn assistant_tools(&self) -> Vec<AssistantTools> {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(AssistantTools::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct Greeting(&'static str);

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename = "echo")]
    #[schemars(description = "echo the text back")]
    struct Echo {
        #[schemars(description = "text to echo")]
        text: String,
    }

    impl Tool for Echo {
        type Context = Greeting;
        fn apply(&self, context: &Self::Context) -> Result<String, ToolError> {
            Ok(format!("{} {}", context.0, self.text))
        }
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename = "echo")]
    #[schemars(description = "a second tool claiming the same name")]
    struct EchoAgain {}

    impl Tool for EchoAgain {
        type Context = Greeting;
        fn apply(&self, _: &Self::Context) -> Result<String, ToolError> {
            Ok(String::new())
        }
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename = "undocumented")]
    #[schemars(description = "has a property without a description")]
    struct Undocumented {
        #[allow(dead_code)]
        value: String,
    }

    impl Tool for Undocumented {
        type Context = Greeting;
        fn apply(&self, _: &Self::Context) -> Result<String, ToolError> {
            Ok(String::new())
        }
    }

    #[test]
    fn calls_registered_tool_with_context() {
        let toolset = ToolSet::new().add_tool::<Echo>().unwrap();
        let output = toolset
            .try_tool_call(&Greeting("hello"), "echo", r#"{"text":"world"}"#)
            .unwrap();
        assert_eq!(output, "hello world");
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = ToolSet::new()
            .add_tool::<Echo>()
            .unwrap()
            .add_tool::<EchoAgain>();
        assert!(matches!(result, Err(ToolSetCreationError::NameConflict(name)) if name == "echo"));
    }

    #[test]
    fn rejects_properties_without_description() {
        let result = ToolSet::<Greeting>::new().add_tool::<Undocumented>();
        assert!(matches!(result, Err(ToolSetCreationError::Validation(_))));
    }

    #[test]
    fn lookup_reports_missing_tool() {
        let toolset = ToolSet::new().add_tool::<Echo>().unwrap();
        assert!(toolset.lookup("echo").is_ok());
        assert!(matches!(
            toolset.lookup("shout"),
            Err(ToolCallError::NotFound(name)) if name == "shout"
        ));
    }

    #[test]
    fn bad_arguments_are_deserialization_errors() {
        let toolset = ToolSet::new().add_tool::<Echo>().unwrap();
        let result = toolset.try_tool_call(&Greeting("hi"), "echo", r#"{"txt":1}"#);
        assert!(matches!(result, Err(ToolCallError::Deserialization(_))));
    }

    #[test]
    fn exports_function_tools() {
        let toolset = ToolSet::new().add_tool::<Echo>().unwrap();
        let tools = toolset.assistant_tools();
        assert_eq!(tools.len(), 1);
        match &tools[0] {
            AssistantTools::Function(function) => {
                assert_eq!(function.function.name, "echo");
                assert_eq!(
                    function.function.description.as_deref(),
                    Some("echo the text back")
                );
                let parameters = function.function.parameters.as_ref().unwrap();
                assert_eq!(parameters["properties"]["text"]["type"], "string");
            }
            other => panic!("unexpected tool {other:?}"),
        }
    }
}
