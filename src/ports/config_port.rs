//! Configuration access port.

use crate::domain::error::VatraderError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Non-empty string value or `ConfigMissing`.
    fn require_string(&self, section: &str, key: &str) -> Result<String, VatraderError> {
        match self.get_string(section, key) {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(VatraderError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            }),
        }
    }

    /// Boolean value, `default` when absent. Anything other than
    /// true/yes/1 or false/no/0 is `ConfigInvalid`.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, VatraderError> {
        let Some(raw) = self.get_string(section, key) else {
            return Ok(default);
        };
        match raw.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(VatraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("'{}' is not a boolean (expected true or false)", other),
            }),
        }
    }
}
