/// Wavefront OBJ/MTL documents.
pub mod obj;

/// Text encoding of binary streams.
pub mod transport;
