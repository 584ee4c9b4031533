// lib.rs

/// Contains the interface between vertex streams and text documents, namely the
/// obj/mtl reader and writer, and the base64 transport.
pub mod io;

/// Defines the binary stream encoder.
pub mod encode;

/// Defines the binary stream decoder.
pub mod decode;

/// Contains the shared definitions, vertices, materials, and the mesh assembler.
pub mod core;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::mesh::{MeshTables, MeshSummary, builder::{assemble, MeshBuilder}};
    pub use crate::core::material::MaterialLibrary;
    pub use crate::core::shared::{ConfigType, Vec3};
    pub use crate::core::vertex::{Color, MaterialName, Mode, Surface, Vertex};
    pub use crate::core::bit_coder::{ByteReader, ByteWriter, FunctionalByteWriter};
    pub use crate::encode::{self, encode};
    pub use crate::decode::{self, decode};
}
