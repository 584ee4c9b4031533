use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::core::material::Palette;
use crate::core::shared::{ConfigType, Vec3};
use crate::core::vertex::{Mode, Surface, Vertex};
use super::{Face, MeshTables};

#[derive(Debug, Clone)]
pub struct Config {
    /// Reject triangles whose vertices disagree on the material instead of
    /// using the material of the first vertex.
    pub strict_face_materials: bool,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            strict_face_materials: false,
        }
    }
}

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("Face {face} has vertices with different materials")]
    DivergentFaceMaterial { face: usize },
    #[error("Vertex count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Collects triangles into `MeshTables`.
pub struct MeshBuilder<S> {
    positions: IndexSet<Vec3>,
    normals: IndexSet<Vec3>,
    palette: Palette,
    faces: IndexMap<String, Vec<Face>>,
    num_faces: usize,
    cfg: Config,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: Surface> MeshBuilder<S> {
    pub fn new(cfg: Config) -> Self {
        Self {
            positions: IndexSet::new(),
            normals: IndexSet::new(),
            palette: Palette::new(),
            faces: IndexMap::new(),
            num_faces: 0,
            cfg,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Adds one triangle. The material of the face is the material of its first vertex.
    pub fn add_triangle(&mut self, triangle: [&Vertex<S>; 3]) -> Result<(), Err> {
        let face_idx = self.num_faces;
        let surface = &triangle[0].surface;
        if triangle[1..].iter().any(|v| &v.surface != surface) {
            if self.cfg.strict_face_materials {
                return Err(Err::DivergentFaceMaterial { face: face_idx });
            }
            tracing::warn!(
                face = face_idx,
                "vertices of the face use different materials, using the first one"
            );
        }

        let mut face = Face { positions: [0; 3], normals: [0; 3] };
        for (i, v) in triangle.iter().enumerate() {
            face.positions[i] = self.positions.insert_full(v.position).0;
            face.normals[i] = self.normals.insert_full(v.normal).0;
        }

        let material = surface.material_name(&mut self.palette);
        self.faces.entry(material).or_default().push(face);
        self.num_faces += 1;
        Ok(())
    }

    pub fn build(self) -> MeshTables {
        let Self { positions, normals, palette, faces, .. } = self;
        let materials = match S::MODE {
            Mode::Static => Some(palette.into_library()),
            Mode::Dynamic => None,
        };
        MeshTables { positions, normals, materials, faces }
    }
}

/// Builds the tables of a decoded stream, where every three consecutive vertices form a triangle.
pub fn assemble<S: Surface>(vertices: &[Vertex<S>], cfg: Config) -> Result<MeshTables, Err> {
    if vertices.len() % 3 != 0 {
        return Err(Err::IncompleteTriangle(vertices.len()));
    }

    let mut builder = MeshBuilder::new(cfg);
    for chunk in vertices.chunks_exact(3) {
        if let [v0, v1, v2] = chunk {
            builder.add_triangle([v0, v1, v2])?;
        }
    }
    let tables = builder.build();

    tracing::debug!(
        positions = tables.positions.len(),
        normals = tables.normals.len(),
        groups = tables.faces.len(),
        faces = tables.num_faces(),
        "assembled mesh tables"
    );
    Ok(tables)
}
