pub mod builder;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::core::material::MaterialLibrary;
use crate::core::shared::Vec3;

/// A triangle given by 0-based indices into `MeshTables::positions` and `MeshTables::normals`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub positions: [usize; 3],
    pub normals: [usize; 3],
}

/// Deduplicated geometry with faces grouped by material.
#[derive(Clone, Debug, Default)]
pub struct MeshTables {
    pub positions: IndexSet<Vec3>,
    pub normals: IndexSet<Vec3>,

    /// Colors of the synthesized materials. `None` for dynamic streams,
    /// which carry material names only.
    pub materials: Option<MaterialLibrary>,

    /// Groups in the order their material was first used by a face.
    pub faces: IndexMap<String, Vec<Face>>,
}

impl MeshTables {
    pub fn num_faces(&self) -> usize {
        self.faces.values().map(Vec::len).sum()
    }

    pub fn summary(&self) -> MeshSummary {
        MeshSummary {
            num_positions: self.positions.len(),
            num_normals: self.normals.len(),
            num_materials: self.materials.as_ref().map(MaterialLibrary::len),
            num_faces: self.num_faces(),
            groups: self.faces.iter()
                .map(|(name, faces)| GroupSummary {
                    material: name.clone(),
                    num_faces: faces.len(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeshSummary {
    pub num_positions: usize,
    pub num_normals: usize,
    pub num_materials: Option<usize>,
    pub num_faces: usize,
    pub groups: Vec<GroupSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub material: String,
    pub num_faces: usize,
}
