use thiserror::Error;

use crate::core::material::MaterialLibrary;
use super::{parse_vec3, split_keyword};

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("line {line}: 'Kd' found without a preceding 'newmtl'")]
    ColorWithoutMaterial { line: usize },
    #[error("line {line}: malformed line '{content}'")]
    MalformedLine { line: usize, content: String },
}

/// Reads the diffuse colors of a material library document.
/// Only `newmtl` and `Kd` are interpreted, everything else is skipped.
pub fn parse_mtl(content: &str) -> Result<MaterialLibrary, Err> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<&str> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let malformed = || Err::MalformedLine { line, content: raw.to_owned() };
        let (keyword, rest) = split_keyword(raw);
        match keyword {
            "newmtl" => {
                if rest.is_empty() {
                    return Err(malformed());
                }
                current = Some(rest);
            }
            "Kd" => {
                let name = current.ok_or(Err::ColorWithoutMaterial { line })?;
                let color = parse_vec3(rest).ok_or_else(malformed)?;
                library.insert(name, color);
            }
            _ => {}
        }
    }

    Ok(library)
}
