use crate::core::bit_coder::ByteReader;
use crate::core::vertex::{self, Color, MaterialName, Mode, Surface, Vertex};

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("Invalid mode '{0}': expected 'static' or 'dynamic'")]
    InvalidMode(String),
    #[error("Material name of the record at byte {offset} is not valid UTF-8")]
    NonUtf8MaterialName { offset: usize },
    #[error("Record at byte {offset} is truncated: only {remaining} bytes left")]
    TruncatedRecord { offset: usize, remaining: usize },
}

/// Reads records until the reader is exhausted, yielding each vertex together with the
/// number of bytes its record occupied. Iteration stops after the first error.
pub struct Decoder<'r, R, S> {
    reader: &'r mut R,
    offset: usize,
    failed: bool,
    _phantom: std::marker::PhantomData<S>,
}

impl<'r, R: ByteReader, S: Surface> Decoder<'r, R, S> {
    pub fn new(reader: &'r mut R) -> Self {
        Self {
            reader,
            offset: 0,
            failed: false,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<R: ByteReader, S: Surface> Iterator for Decoder<'_, R, S> {
    type Item = Result<(Vertex<S>, usize), Err>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.reader.num_remaining();
        if self.failed || remaining == 0 {
            return None;
        }

        let offset = self.offset;
        match Vertex::<S>::read_from(&mut *self.reader) {
            Ok(vertex) => {
                let size = remaining - self.reader.num_remaining();
                self.offset += size;
                Some(Ok((vertex, size)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(match err {
                    vertex::Err::NonUtf8MaterialName => Err::NonUtf8MaterialName { offset },
                    _ => Err::TruncatedRecord { offset, remaining },
                }))
            }
        }
    }
}

/// Decodes the whole stream. The records must cover the input exactly.
pub fn decode<S, R>(reader: &mut R) -> Result<Vec<Vertex<S>>, Err>
    where S: Surface, R: ByteReader
{
    let vertices = Decoder::<R, S>::new(reader)
        .map(|r| r.map(|(vertex, _)| vertex))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(mode = %S::MODE, records = vertices.len(), "decoded vertex stream");
    Ok(vertices)
}

/// A decoded stream whose layout was selected at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Stream {
    Static(Vec<Vertex<Color>>),
    Dynamic(Vec<Vertex<MaterialName>>),
}

impl Stream {
    pub fn mode(&self) -> Mode {
        match self {
            Stream::Static(_) => Mode::Static,
            Stream::Dynamic(_) => Mode::Dynamic,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Stream::Static(v) => v.len(),
            Stream::Dynamic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decodes `data` with the layout named by `mode` (`"static"` or `"dynamic"`).
pub fn decode_with_mode(data: &[u8], mode: &str) -> Result<Stream, Err> {
    let mode = mode.parse::<Mode>()
        .map_err(|_| Err::InvalidMode(mode.to_owned()))?;
    decode_stream(data, mode)
}

pub fn decode_stream(data: &[u8], mode: Mode) -> Result<Stream, Err> {
    let mut reader = data.iter();
    Ok(match mode {
        Mode::Static => Stream::Static(decode(&mut reader)?),
        Mode::Dynamic => Stream::Dynamic(decode(&mut reader)?),
    })
}
