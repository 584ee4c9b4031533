use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("Invalid base64 data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

pub fn to_base64(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decodes standard base64. Surrounding whitespace and a bytes-literal
/// wrapper (`b'...'`) are stripped first.
pub fn from_base64(text: &str) -> Result<Vec<u8>, Err> {
    let text = text.trim();
    let text = text.strip_prefix("b'")
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text);
    Ok(general_purpose::STANDARD.decode(text)?)
}
