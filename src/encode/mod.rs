use thiserror::Error;

use crate::core::bit_coder::ByteWriter;
use crate::core::vertex::{self, write_vec3, Surface, Vertex};

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("Record {index} cannot be encoded: {source}")]
    InvalidRecord { index: usize, source: vertex::Err },
    #[error("Material name of record {index} is {len} bytes long, but at most 255 bytes are allowed")]
    MaterialNameTooLong { index: usize, len: usize },
}

fn record_err(index: usize, err: vertex::Err) -> Err {
    match err {
        vertex::Err::MaterialNameTooLong(len) => Err::MaterialNameTooLong { index, len },
        source => Err::InvalidRecord { index, source },
    }
}

/// Encodes the vertices into the writer, one record per vertex.
/// All records are validated first, so nothing is written if any of them is invalid.
pub fn encode<S, W>(vertices: &[Vertex<S>], writer: &mut W) -> Result<(), Err>
    where S: Surface, W: ByteWriter
{
    for (index, v) in vertices.iter().enumerate() {
        v.surface.validate().map_err(|e| record_err(index, e))?;
    }

    for (index, v) in vertices.iter().enumerate() {
        write_vec3(v.position, writer);
        write_vec3(v.normal, writer);
        v.surface.write_to(writer).map_err(|e| record_err(index, e))?;
    }

    tracing::debug!(mode = %S::MODE, records = vertices.len(), "encoded vertex stream");
    Ok(())
}

pub fn encode_to_vec<S: Surface>(vertices: &[Vertex<S>]) -> Result<Vec<u8>, Err> {
    let mut buffer = Vec::new();
    encode(vertices, &mut buffer)?;
    Ok(buffer)
}
