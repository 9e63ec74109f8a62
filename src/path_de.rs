use serde::de::DeserializeOwned;
use thiserror::Error;

/// A decode failure with the JSON path where it happened.
#[derive(Error, Debug)]
#[error("at JSON path {path} → {message}")]
pub struct PathError {
    pub path: String,
    pub message: String,
}

impl From<serde_path_to_error::Error<serde_json::Error>> for PathError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Self { path, message: err.into_inner().to_string() }
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}
