use indexmap::IndexMap;

use crate::core::shared::Vec3;

/// Diffuse colors by material name, in definition order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: IndexMap<String, Vec3>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self {
            materials: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Vec3> {
        self.materials.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Registers the color of `name`. The first color registered for a name is kept;
    /// returns `false` if the name was already defined.
    pub fn insert(&mut self, name: impl Into<String>, color: Vec3) -> bool {
        match self.materials.entry(name.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(e) => {
                e.insert(color);
                true
            }
        }
    }

    /// Merges `other` into `self` without overriding existing definitions.
    pub fn merge(&mut self, other: MaterialLibrary) {
        for (name, color) in other.materials {
            self.insert(name, color);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec3)> {
        self.materials.iter().map(|(name, &color)| (name.as_str(), color))
    }
}

/// Assigns names to colors in first-seen order: `material_0`, `material_1`, ...
#[derive(Clone, Debug, Default)]
pub struct Palette {
    names: IndexMap<Vec3, String>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            names: IndexMap::new(),
        }
    }

    pub fn name_of(&mut self, color: Vec3) -> &str {
        let next = self.names.len();
        self.names
            .entry(color)
            .or_insert_with(|| format!("material_{}", next))
    }

    pub fn into_library(self) -> MaterialLibrary {
        let mut library = MaterialLibrary::new();
        for (color, name) in self.names {
            library.insert(name, color);
        }
        library
    }
}
