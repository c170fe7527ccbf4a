//! Engine configuration.

use serde::Deserialize;

use crate::error::ChaincodeError;

/// Discriminator written to `docType` by default.
pub const DEFAULT_DOC_TYPE: &str = "datastatis";

/// Separator placed between composite key components by default.
pub const DEFAULT_KEY_SEPARATOR: char = '_';

/// Settings shared by the lifecycle engine and the key deriver.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub doc_type: String,
    pub key_separator: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            key_separator: DEFAULT_KEY_SEPARATOR,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ChaincodeError> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| ChaincodeError::InvalidArgument(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject separators that could appear inside a numeric key component.
    pub fn validate(&self) -> Result<(), ChaincodeError> {
        if self.key_separator.is_ascii_digit() || self.key_separator == '-' {
            return Err(ChaincodeError::InvalidArgument(format!(
                "key separator {:?} collides with numeric key components",
                self.key_separator
            )));
        }
        if self.doc_type.is_empty() {
            return Err(ChaincodeError::InvalidArgument(
                "docType must not be empty".into(),
            ));
        }
        Ok(())
    }
}
