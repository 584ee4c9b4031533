use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

/// Three `f32` components; a position, a normal or an rgb color.
///
/// Equality and hashing compare the bit patterns of the components, so a
/// `Vec3` can be used as a deduplication key: `0.0` and `-0.0` are different
/// keys, and a NaN matches a NaN with the identical bit pattern.
#[derive(Clone, Copy, Default)]
pub struct Vec3([f32; 3]);

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self([x, y, z])
    }

    pub fn as_array(&self) -> &[f32; 3] {
        &self.0
    }

    pub fn to_bits(self) -> [u32; 3] {
        self.0.map(f32::to_bits)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(data: [f32; 3]) -> Self {
        Self(data)
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.0
    }
}

impl ops::Index<usize> for Vec3 {
    type Output = f32;

    fn index(&self, idx: usize) -> &f32 {
        &self.0[idx]
    }
}

impl PartialEq for Vec3 {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Vec3 {}

impl Hash for Vec3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl fmt::Debug for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Writes the components separated by single spaces, each in the shortest
/// form that parses back to the same `f32`.
impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.0[0], self.0[1], self.0[2])
    }
}


pub trait ConfigType {
    fn default()-> Self;
}
