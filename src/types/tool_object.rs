use super::Tool;

use async_openai::types::{AssistantTools, AssistantToolsFunction, FunctionObject};
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use schemars::schema::{RootSchema, Schema, SchemaObject};
use serde::de::Deserialize;
use serde_json::Error as JsonError;
use serde_json::Value;
use thiserror::Error;

type ToolTraitObject<C> = Box<dyn Tool<Context = C> + Send + Sync>;
type Deserializer<C> = Box<dyn Fn(&str) -> Result<ToolTraitObject<C>, JsonError> + Send + Sync>;

pub struct ToolObject<C> {
    pub json_schema: Value,
    pub description: String,
    pub name: String,
    deserializer: Deserializer<C>,
}

impl<C> ToolObject<C> {
    pub fn try_deserialize(&self, data: &str) -> Result<ToolTraitObject<C>, JsonError> {
        let deserializer = &self.deserializer;
        deserializer(data)
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tool schema is missing a title or description")]
    MissingMetadata,
    #[error("could not convert to json")]
    JsonSerialization(JsonError),
}

impl<C> From<&ToolObject<C>> for AssistantTools {
    fn from(value: &ToolObject<C>) -> Self {
        AssistantTools::Function(AssistantToolsFunction {
            function: FunctionObject {
                name: value.name.clone(),
                description: Some(value.description.clone()),
                parameters: Some(value.json_schema.clone()),
                strict: None,
            },
        })
    }
}

impl<C> ToolObject<C> {
    pub fn try_from_tool<T>() -> Result<Self, ValidationError>
    where
        T: JsonSchema + Tool<Context = C> + Send + Sync + for<'de> Deserialize<'de> + 'static,
    {
        let schema = inline_schema_for::<T>();

        let (name, description) = validate_tool_schema(&schema.schema)?;

        let mut json_schema =
            serde_json::to_value(&schema).map_err(ValidationError::JsonSerialization)?;
        require_all_properties(&mut json_schema);

        let deserializer = Box::new(|data: &str| {
            serde_json::from_str::<T>(data).map(|tool| Box::new(tool) as ToolTraitObject<C>)
        });

        Ok(Self {
            name,
            json_schema,
            description,
            deserializer,
        })
    }
}

// function parameters must be self-contained, so nested types are inlined
// instead of emitted as `definitions` references
fn inline_schema_for<T: JsonSchema>() -> RootSchema {
    SchemaSettings::draft07()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>()
}

// serde defaults only soften what the executor accepts; the model is still
// asked to supply every argument
fn require_all_properties(json_schema: &mut Value) {
    let Some(properties) = json_schema.get("properties").and_then(Value::as_object) else {
        return;
    };
    let required = properties.keys().cloned().map(Value::String).collect();
    json_schema["required"] = Value::Array(required);
}

fn validate_tool_schema(schema: &SchemaObject) -> Result<(String, String), ValidationError> {
    let name = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .title
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .to_string();

    let description = validate_tool_description(schema)?;
    Ok((name, description))
}

// the model only sees descriptions, so every property needs one
fn validate_tool_description(schema: &SchemaObject) -> Result<String, ValidationError> {
    let description = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .description
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?;

    if let Some(object) = schema.object.as_deref() {
        for sub_schema in object.properties.values() {
            if let Schema::Object(sub_schema_object) = sub_schema {
                validate_tool_description(sub_schema_object)?;
            }
        }
    }

    Ok(description.to_string())
}
