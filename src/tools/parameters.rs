//! Invocation parameters and parameter descriptors.
//!
//! [`ToolParameters`] is the per-call map the host passes in. Tools read it
//! once, at the boundary, into their own typed argument structs.
//! [`ParameterDescriptor`] is the static schema the host renders into forms
//! and LLM tool schemas.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::host::FileHandle;

// ── Invocation parameters ──────────────────────────────────────

/// A single parameter value supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Plain string (also carries select values).
    String(String),
    /// Reference to a host-stored file.
    File(FileHandle),
    /// Anything else (numbers, booleans, arrays...).
    Other(serde_json::Value),
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<FileHandle> for ParameterValue {
    fn from(value: FileHandle) -> Self {
        Self::File(value)
    }
}

/// Parameter map for one invocation. Read-only for tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolParameters {
    values: HashMap<String, ParameterValue>,
}

impl ToolParameters {
    /// Empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Decode a host-supplied JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Raw value for `name`.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// String value for `name`; `None` if absent or not a string.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParameterValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Non-blank string value for `name`, or `default`.
    ///
    /// Host forms send `""` for untouched optional fields, so blank strings
    /// fall back to the default too.
    pub fn str_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.str(name) {
            Some(s) if !s.trim().is_empty() => s,
            _ => default,
        }
    }

    /// Whether `name` was left unset. An explicit JSON `null` counts as unset.
    pub fn is_absent(&self, name: &str) -> bool {
        matches!(
            self.values.get(name),
            None | Some(ParameterValue::Other(serde_json::Value::Null))
        )
    }

    /// File handle for `name`; `None` if absent or not a file.
    pub fn file(&self, name: &str) -> Option<&FileHandle> {
        match self.values.get(name) {
            Some(ParameterValue::File(f)) => Some(f),
            _ => None,
        }
    }
}

// ── Descriptors ────────────────────────────────────────────────

/// Localized text. English is mandatory; Japanese is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nText {
    /// English text.
    #[serde(rename = "en_US")]
    pub en_us: String,
    /// Japanese text.
    #[serde(rename = "ja_JP", default, skip_serializing_if = "Option::is_none")]
    pub ja_jp: Option<String>,
}

impl I18nText {
    /// English and Japanese text.
    pub fn new(en_us: impl Into<String>, ja_jp: impl Into<String>) -> Self {
        Self {
            en_us: en_us.into(),
            ja_jp: Some(ja_jp.into()),
        }
    }

    /// Text for `locale` (`ja_JP` or anything else for English).
    pub fn localized(&self, locale: &str) -> &str {
        match (locale, &self.ja_jp) {
            ("ja_JP", Some(ja)) => ja,
            _ => &self.en_us,
        }
    }
}

/// Primitive type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Free text.
    String,
    /// One of an enumerated set of options.
    Select,
    /// A host file reference.
    File,
}

/// Who fills a parameter in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterForm {
    /// The user, through the host's configuration form.
    Form,
    /// The model, at call time.
    Llm,
}

/// An allowed value for a [`ParameterType::Select`] parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOption {
    /// Wire value.
    pub value: String,
    /// Display label.
    pub label: I18nText,
}

impl ParameterOption {
    /// Option with English and Japanese labels.
    pub fn new(value: impl Into<String>, en_us: &str, ja_jp: &str) -> Self {
        Self {
            value: value.into(),
            label: I18nText::new(en_us, ja_jp),
        }
    }
}

/// Static description of one accepted parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name as it appears in [`ToolParameters`].
    pub name: String,
    /// Short label.
    pub label: I18nText,
    /// Longer description for humans (and the LLM, in English).
    pub human_description: I18nText,
    /// Primitive type.
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Who fills it in.
    pub form: ParameterForm,
    /// Whether the host must supply it.
    pub required: bool,
    /// Value used when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Allowed values for select parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterOption>,
}

impl ParameterDescriptor {
    /// Optional parameter with no default and no options.
    pub fn new(
        name: &str,
        param_type: ParameterType,
        form: ParameterForm,
        label: I18nText,
        human_description: I18nText,
    ) -> Self {
        Self {
            name: name.to_owned(),
            label,
            human_description,
            param_type,
            form,
            required: false,
            default: None,
            options: Vec::new(),
        }
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_owned());
        self
    }

    /// Set the allowed options.
    #[must_use]
    pub fn options(mut self, options: Vec<ParameterOption>) -> Self {
        self.options = options;
        self
    }
}

/// Build the JSON Schema for the LLM-filled subset of `descriptors`.
pub fn llm_input_schema(descriptors: &[ParameterDescriptor]) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for d in descriptors.iter().filter(|d| d.form == ParameterForm::Llm) {
        let mut prop = json!({
            "type": "string",
            "description": d.human_description.en_us,
        });
        if d.param_type == ParameterType::File {
            prop["format"] = json!("file");
        }
        if !d.options.is_empty() {
            prop["enum"] = d.options.iter().map(|o| json!(o.value)).collect();
        }
        if let Some(default) = &d.default {
            prop["default"] = json!(default);
        }
        if d.required {
            required.push(json!(d.name));
        }
        properties.insert(d.name.clone(), prop);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
