pub mod bit_coder;
pub mod material;
pub mod mesh;
pub mod shared;
pub mod vertex;
