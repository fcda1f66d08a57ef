use std::path::Path;

use robemax_core::{ErrorInfo, RobustError};
use serde::{de::DeserializeOwned, Serialize};

fn serde_error(code: &str, err: impl ToString) -> RobustError {
    RobustError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, RobustError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json_deserialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, RobustError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, RobustError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml_deserialize", err))
}

/// Reads a file and decodes it as JSON when the extension says so, YAML otherwise.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, RobustError> {
    let bytes = std::fs::read(path).map_err(|err| {
        RobustError::Serde(
            ErrorInfo::new("file_read", err.to_string())
                .with_context("path", path.display()),
        )
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json_slice(&bytes),
        _ => from_yaml_slice(&bytes),
    }
}
