//! Runtime binding names
//!
//! Which declarations the lowering treats as the throwable base class and the
//! runtime intrinsics. The defaults match the JS runtime library; other
//! targets supply a `bindings.toml`:
//!
//! ```toml
//! throwable-class = "kotlin.Throwable"
//!
//! [intrinsics]
//! field-get = "kotlin.js.jsGetJSField"
//! field-set = "kotlin.js.jsSetJSField"
//! capture-stack = "kotlin.js.captureStack"
//!
//! [keys]
//! message = "message"
//! cause = "cause"
//! name = "name"
//! ```
//!
//! Omitted entries keep their defaults.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the declarations the lowering binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BindingNames {
    /// Fully qualified name of the throwable base class
    pub throwable_class: String,

    /// Simple name of the base class's `toString`
    pub to_string: String,

    /// Property backing the message getter
    pub message_property: String,

    /// Property backing the cause getter
    pub cause_property: String,

    /// Intrinsic function names
    pub intrinsics: IntrinsicNames,

    /// Dynamic field keys written and read on instances
    pub keys: FieldKeys,
}

impl Default for BindingNames {
    fn default() -> Self {
        Self {
            throwable_class: "kotlin.Throwable".to_string(),
            to_string: "toString".to_string(),
            message_property: "message".to_string(),
            cause_property: "cause".to_string(),
            intrinsics: IntrinsicNames::default(),
            keys: FieldKeys::default(),
        }
    }
}

/// Fully qualified names of the runtime intrinsics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IntrinsicNames {
    /// `(receiver, key) -> value`
    pub field_get: String,
    /// `(receiver, key, value) -> Unit`
    pub field_set: String,
    /// `(receiver) -> Unit`
    pub capture_stack: String,
}

impl Default for IntrinsicNames {
    fn default() -> Self {
        Self {
            field_get: "kotlin.js.jsGetJSField".to_string(),
            field_set: "kotlin.js.jsSetJSField".to_string(),
            capture_stack: "kotlin.js.captureStack".to_string(),
        }
    }
}

/// Dynamic field keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    /// Key holding the message
    pub message: String,
    /// Key holding the cause
    pub cause: String,
    /// Key holding the class name
    pub name: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            message: "message".to_string(),
            cause: "cause".to_string(),
            name: "name".to_string(),
        }
    }
}

impl BindingNames {
    /// Parse bindings from a file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse bindings from a TOML string
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let names: BindingNames = toml::from_str(content)?;
        names.validate()?;
        Ok(names)
    }

    /// Check that every name is usable
    pub fn validate(&self) -> ConfigResult<()> {
        let entries = [
            ("throwable-class", &self.throwable_class),
            ("to-string", &self.to_string),
            ("message-property", &self.message_property),
            ("cause-property", &self.cause_property),
            ("intrinsics.field-get", &self.intrinsics.field_get),
            ("intrinsics.field-set", &self.intrinsics.field_set),
            ("intrinsics.capture-stack", &self.intrinsics.capture_stack),
            ("keys.message", &self.keys.message),
            ("keys.cause", &self.keys.cause),
            ("keys.name", &self.keys.name),
        ];
        for (entry, value) in entries {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{} cannot be empty", entry)));
            }
        }

        let keys = [&self.keys.message, &self.keys.cause, &self.keys.name];
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(ConfigError::Invalid(format!(
                    "field key '{}' is used more than once",
                    key
                )));
            }
        }

        Ok(())
    }
}
