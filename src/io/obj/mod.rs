pub mod mtl;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::material::MaterialLibrary;
use crate::core::shared::Vec3;
use crate::core::vertex::{self, Mode, Surface, Vertex};

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("line {line}: {kind} index {index} is out of range, {len} defined so far")]
    IndexOutOfRange { line: usize, kind: &'static str, index: i64, len: usize },
    #[error("Failed to read '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("line {line}: malformed line '{content}'")]
    MalformedLine { line: usize, content: String },
    #[error("line {line}: material library '{path}': {source}")]
    MaterialLibrary { line: usize, path: String, source: mtl::Err },
    #[error("line {line}: cannot load material library '{path}': {source}")]
    MaterialLibraryIo { line: usize, path: String, source: std::io::Error },
    #[error("line {line}: material name is {len} bytes long, but at most 255 bytes are allowed")]
    MaterialNameTooLong { line: usize, len: usize },
    #[error("line {line}: face defined without an active material")]
    MissingMaterial { line: usize },
    #[error("line {line}: material '{name}' is not defined in the material library")]
    UnknownMaterial { line: usize, name: String },
}

/// Splits a line into its leading keyword and the trimmed remainder.
pub(crate) fn split_keyword(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    }
}

/// Parses exactly three whitespace separated floats.
pub(crate) fn parse_vec3(s: &str) -> Option<Vec3> {
    let mut tokens = s.split_whitespace();
    let mut out = [0.0_f32; 3];
    for c in out.iter_mut() {
        *c = tokens.next()?.parse().ok()?;
    }
    if tokens.next().is_some() {
        return None;
    }
    Some(Vec3::from(out))
}

/// Parses a `p//n` face token into its raw 1-based indices.
fn parse_face_vertex(token: &str) -> Option<(i64, i64)> {
    let (p, n) = token.split_once("//")?;
    Some((p.parse().ok()?, n.parse().ok()?))
}

fn lookup(table: &[Vec3], index: i64) -> Option<Vec3> {
    let index = usize::try_from(index).ok()?.checked_sub(1)?;
    table.get(index).copied()
}

/// Reads a geometry document into one vertex per face corner.
///
/// `load_library` is called with the argument of every `mtllib` line and must return the
/// content of that material library. Static surfaces take their color from the library,
/// dynamic surfaces keep the material name as it is. A library that cannot be loaded is
/// an error for static surfaces and only logged for dynamic ones, but a library that
/// loads and is malformed is an error in both modes.
pub fn parse_obj<S, F>(content: &str, mut load_library: F) -> Result<Vec<Vertex<S>>, Err>
    where S: Surface, F: FnMut(&str) -> std::io::Result<String>
{
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut library = MaterialLibrary::new();
    let mut current: Option<S> = None;
    let mut vertices = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let malformed = || Err::MalformedLine { line, content: raw.to_owned() };
        let (keyword, rest) = split_keyword(raw);
        match keyword {
            "v" => positions.push(parse_vec3(rest).ok_or_else(malformed)?),
            "vn" => normals.push(parse_vec3(rest).ok_or_else(malformed)?),
            "mtllib" => {
                if rest.is_empty() {
                    return Err(malformed());
                }
                let text = match load_library(rest) {
                    Ok(text) => text,
                    Err(source) if S::MODE == Mode::Dynamic => {
                        tracing::warn!(line, path = rest, "cannot load material library: {}", source);
                        continue;
                    }
                    Err(source) => return Err(Err::MaterialLibraryIo { line, path: rest.to_owned(), source }),
                };
                let loaded = mtl::parse_mtl(&text)
                    .map_err(|source| Err::MaterialLibrary { line, path: rest.to_owned(), source })?;
                library.merge(loaded);
            }
            "usemtl" => {
                if rest.is_empty() {
                    return Err(malformed());
                }
                let surface = S::from_material(rest, &library).map_err(|err| match err {
                    vertex::Err::MaterialNameTooLong(len) => Err::MaterialNameTooLong { line, len },
                    vertex::Err::UnknownMaterial(name) => Err::UnknownMaterial { line, name },
                    _ => malformed(),
                })?;
                current = Some(surface);
            }
            "f" => {
                let surface = current.as_ref().ok_or(Err::MissingMaterial { line })?;
                let tokens = rest.split_whitespace().collect::<Vec<_>>();
                if tokens.len() != 3 {
                    return Err(malformed());
                }
                for token in tokens {
                    let (p, n) = parse_face_vertex(token).ok_or_else(malformed)?;
                    let position = lookup(&positions, p).ok_or(Err::IndexOutOfRange {
                        line, kind: "position", index: p, len: positions.len()
                    })?;
                    let normal = lookup(&normals, n).ok_or(Err::IndexOutOfRange {
                        line, kind: "normal", index: n, len: normals.len()
                    })?;
                    vertices.push(Vertex { position, normal, surface: surface.clone() });
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        mode = %S::MODE,
        vertices = vertices.len(),
        materials = library.len(),
        "parsed geometry document"
    );
    Ok(vertices)
}

/// Loads a geometry document from disk. `mtllib` paths are resolved relative to the
/// directory containing the document.
pub fn load_obj<S, P>(path: P) -> Result<Vec<Vertex<S>>, Err>
    where S: Surface, P: AsRef<Path>
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|source| Err::Io { path: path.to_owned(), source })?;
    let dir = path.parent().unwrap_or(Path::new(""));
    parse_obj(&content, |name| fs::read_to_string(dir.join(name)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vertex::{Color, MaterialName};
    use std::io;

    const TRIANGLE: &str = "\
o mesh
mtllib mesh.mtl
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
s 0
usemtl material_0
f 1//1 2//1 3//1
";

    const TRIANGLE_MTL: &str = "newmtl material_0\nKd 1 0 0\n";

    fn no_library(name: &str) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::NotFound, name.to_owned()))
    }

    fn with_library(name: &str) -> io::Result<String> {
        match name {
            "mesh.mtl" => Ok(TRIANGLE_MTL.to_owned()),
            _ => no_library(name),
        }
    }

    #[test]
    fn static_triangle() {
        let vertices = parse_obj::<Color, _>(TRIANGLE, with_library).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
        assert!(vertices.iter().all(|v| v.normal == Vec3::new(0.0, 0.0, 1.0)));
        assert!(vertices.iter().all(|v| v.surface == Color(Vec3::new(1.0, 0.0, 0.0))));
    }

    #[test]
    fn dynamic_names_pass_through() {
        let obj = TRIANGLE.replace("usemtl material_0", "usemtl procedural_lava");
        let vertices = parse_obj::<MaterialName, _>(&obj, with_library).unwrap();
        assert!(vertices.iter().all(|v| v.surface.as_str() == "procedural_lava"));
    }

    #[test]
    fn unknown_static_material() {
        let obj = TRIANGLE.replace("usemtl material_0", "usemtl foo");
        assert!(matches!(
            parse_obj::<Color, _>(&obj, with_library),
            Err(Err::UnknownMaterial { line: 8, ref name }) if name == "foo"
        ));
    }

    #[test]
    fn face_before_material() {
        let obj = "v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//1\nusemtl a\n";
        assert!(matches!(
            parse_obj::<MaterialName, _>(obj, no_library),
            Err(Err::MissingMaterial { line: 3 })
        ));
    }

    #[test]
    fn long_material_name() {
        let obj = format!("v 0 0 0\nvn 0 0 1\nusemtl {}\n", "m".repeat(256));
        assert!(matches!(
            parse_obj::<MaterialName, _>(&obj, no_library),
            Err(Err::MaterialNameTooLong { line: 3, len: 256 })
        ));
    }

    #[test]
    fn indices_must_be_defined_before_use() {
        let obj = "v 0 0 0\nvn 0 0 1\nusemtl a\nf 1//1 2//1 1//1\nv 1 1 1\n";
        assert!(matches!(
            parse_obj::<MaterialName, _>(obj, no_library),
            Err(Err::IndexOutOfRange { line: 4, kind: "position", index: 2, len: 1 })
        ));

        let obj = "v 0 0 0\nvn 0 0 1\nusemtl a\nf 1//1 1//0 1//1\n";
        assert!(matches!(
            parse_obj::<MaterialName, _>(obj, no_library),
            Err(Err::IndexOutOfRange { line: 4, kind: "normal", index: 0, .. })
        ));

        let obj = "v 0 0 0\nvn 0 0 1\nusemtl a\nf -1//1 1//1 1//1\n";
        assert!(matches!(
            parse_obj::<MaterialName, _>(obj, no_library),
            Err(Err::IndexOutOfRange { line: 4, index: -1, .. })
        ));
    }

    #[test]
    fn malformed_lines() {
        for obj in [
            "v 0 0\n",
            "vn 0 0 one\n",
            "v 0 0 0 1\n",
            "usemtl\n",
            "mtllib\n",
            "v 0 0 0\nvn 0 0 1\nusemtl a\nf 1//1 1//1\n",
            "v 0 0 0\nvn 0 0 1\nusemtl a\nf 1//1 1//1 1//1 1//1\n",
            "v 0 0 0\nvn 0 0 1\nusemtl a\nf 1/1/1 1//1 1//1\n",
            "v 0 0 0\nvn 0 0 1\nusemtl a\nf 1//x 1//1 1//1\n",
        ] {
            assert!(
                matches!(parse_obj::<MaterialName, _>(obj, no_library), Err(Err::MalformedLine { .. })),
                "expected a malformed line in {:?}", obj
            );
        }
    }

    #[test]
    fn comments_and_unknown_lines_are_ignored() {
        let obj = "# header\n\no thing\ng group\nv 0 0 0\r\nvn 0 0 1\nusemtl a\n  f 1//1 1//1 1//1  \n";
        let vertices = parse_obj::<MaterialName, _>(obj, no_library).unwrap();
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn missing_library() {
        assert!(matches!(
            parse_obj::<Color, _>(TRIANGLE, no_library),
            Err(Err::MaterialLibraryIo { line: 2, ref path, .. }) if path == "mesh.mtl"
        ));
    }

    #[test]
    fn missing_library_is_tolerated_for_names() {
        let obj = TRIANGLE.replace("usemtl material_0", "usemtl procedural_lava");
        let vertices = parse_obj::<MaterialName, _>(&obj, no_library).unwrap();
        assert_eq!(vertices.len(), 3);
        assert!(vertices.iter().all(|v| v.surface.as_str() == "procedural_lava"));
    }

    #[test]
    fn broken_library() {
        let result = parse_obj::<Color, _>(TRIANGLE, |_| Ok("Kd 1 0 0\n".to_owned()));
        assert!(matches!(
            result,
            Err(Err::MaterialLibrary { line: 2, source: mtl::Err::ColorWithoutMaterial { line: 1 }, .. })
        ));
    }

    #[test]
    fn material_switches_apply_to_following_faces() {
        let obj = "\
mtllib lib.mtl
v 0 0 0
vn 0 0 1
usemtl red
f 1//1 1//1 1//1
usemtl green
f 1//1 1//1 1//1
";
        let vertices = parse_obj::<Color, _>(obj, |_| {
            Ok("newmtl red\nKd 1 0 0\nnewmtl green\nKd 0 1 0\n".to_owned())
        }).unwrap();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[2].surface, Color(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(vertices[3].surface, Color(Vec3::new(0.0, 1.0, 0.0)));
    }
}
