use std::io::{self, Write};

use thiserror::Error;

use crate::core::mesh::MeshTables;
use crate::core::shared::ConfigType;

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Failed to write the document: {0}")]
    Io(#[from] io::Error),
    #[error("Material name {0:?} cannot be written on a single 'usemtl' line")]
    UnwritableMaterialName(String),
}

/// Group name used for faces whose material name is empty.
pub const UNNAMED_MATERIAL: &str = "unnamed";

#[derive(Debug, Clone)]
pub struct Config {
    /// Written on the `o` line.
    pub object_name: String,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            object_name: "mesh".to_owned(),
        }
    }
}

/// A name survives `usemtl` only if the reader gets it back unchanged, which
/// rules out surrounding whitespace and line breaks.
fn check_material_name(name: &str) -> Result<(), Err> {
    if name.trim() != name || name.contains(['\n', '\r']) {
        return Err(Err::UnwritableMaterialName(name.to_owned()));
    }
    Ok(())
}

/// Writes the geometry document. `mtl_file_name` is written verbatim on the `mtllib` line.
/// All material names are checked before anything is written.
pub fn write_obj<W>(tables: &MeshTables, mtl_file_name: &str, writer: &mut W, cfg: &Config) -> Result<(), Err>
    where W: Write
{
    for material in tables.faces.keys() {
        check_material_name(material)?;
    }

    writeln!(writer, "o {}", cfg.object_name)?;
    writeln!(writer, "mtllib {}", mtl_file_name)?;
    for position in &tables.positions {
        writeln!(writer, "v {}", position)?;
    }
    for normal in &tables.normals {
        writeln!(writer, "vn {}", normal)?;
    }
    writeln!(writer, "s 0")?;

    for (material, faces) in &tables.faces {
        let material = if material.is_empty() { UNNAMED_MATERIAL } else { material.as_str() };
        writeln!(writer, "usemtl {}", material)?;
        // OBJ indices start at 1
        for face in faces {
            let [p0, p1, p2] = face.positions.map(|i| i + 1);
            let [n0, n1, n2] = face.normals.map(|i| i + 1);
            writeln!(writer, "f {}//{} {}//{} {}//{}", p0, n0, p1, n1, p2, n2)?;
        }
    }
    Ok(())
}

/// Writes the material library. Tables without colors produce an empty document.
pub fn write_mtl<W>(tables: &MeshTables, writer: &mut W) -> Result<(), Err>
    where W: Write
{
    if let Some(materials) = &tables.materials {
        for (name, color) in materials.iter() {
            writeln!(writer, "newmtl {}", name)?;
            writeln!(writer, "Kd {}", color)?;
        }
    }
    Ok(())
}

/// Both documents of a mesh, rendered in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Documents {
    pub obj: Vec<u8>,
    pub mtl: Vec<u8>,
}

pub fn write_documents(tables: &MeshTables, mtl_file_name: &str, cfg: &Config) -> Result<Documents, Err> {
    let mut documents = Documents::default();
    write_obj(tables, mtl_file_name, &mut documents.obj, cfg)?;
    write_mtl(tables, &mut documents.mtl)?;
    Ok(documents)
}
