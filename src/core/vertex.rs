use std::fmt;
use std::str::FromStr;

use crate::core::bit_coder::{ByteReader, ByteWriter, ReaderErr};
use crate::core::material::{MaterialLibrary, Palette};
use crate::core::shared::Vec3;

/// Names are length-prefixed with a single byte in the dynamic layout.
pub const MAX_MATERIAL_NAME_LEN: usize = u8::MAX as usize;

#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("Invalid mode '{0}': expected 'static' or 'dynamic'")]
    InvalidMode(String),
    #[error("Material name is {0} bytes long, but at most 255 bytes are allowed")]
    MaterialNameTooLong(usize),
    #[error("Material name is not valid UTF-8")]
    NonUtf8MaterialName,
    #[error("Not enough data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("Material '{0}' is not defined in the material library")]
    UnknownMaterial(String),
}

/// Selects the record layout of a whole stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every record carries an rgb color: 9 floats, 36 bytes.
    Static,
    /// Every record carries a length-prefixed material name.
    Dynamic,
}

impl FromStr for Mode {
    type Err = Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Mode::Static),
            "dynamic" => Ok(Mode::Dynamic),
            _ => Err(Err::InvalidMode(s.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Static => f.write_str("static"),
            Mode::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// The per-vertex attribute that differs between the two layouts.
/// A stream is always read and written with a single implementor.
pub trait Surface: Sized + Clone + PartialEq + fmt::Debug {
    const MODE: Mode;

    /// Reads the part of a record that follows the position and the normal.
    fn read_from<R>(reader: &mut R) -> Result<Self, Err>
        where R: ByteReader;

    /// Checks that the surface can be written in its layout.
    fn validate(&self) -> Result<(), Err> {
        Ok(())
    }

    /// Writes the part of a record that follows the position and the normal.
    /// Nothing is written when an error is returned.
    fn write_to<W>(&self, writer: &mut W) -> Result<(), Err>
        where W: ByteWriter;

    /// The material a face starting with this vertex belongs to.
    fn material_name(&self, palette: &mut Palette) -> String;

    /// Rebuilds the surface from a `usemtl` reference.
    fn from_material(name: &str, library: &MaterialLibrary) -> Result<Self, Err>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub Vec3);

impl Surface for Color {
    const MODE: Mode = Mode::Static;

    fn read_from<R>(reader: &mut R) -> Result<Self, Err>
        where R: ByteReader
    {
        Ok(Color(read_vec3(reader)?))
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<(), Err>
        where W: ByteWriter
    {
        write_vec3(self.0, writer);
        Ok(())
    }

    fn material_name(&self, palette: &mut Palette) -> String {
        palette.name_of(self.0).to_owned()
    }

    fn from_material(name: &str, library: &MaterialLibrary) -> Result<Self, Err> {
        library.get(name)
            .map(Color)
            .ok_or_else(|| Err::UnknownMaterial(name.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialName(pub String);

impl MaterialName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn check_len(name: &str) -> Result<u8, Err> {
        u8::try_from(name.len())
            .map_err(|_| Err::MaterialNameTooLong(name.len()))
    }
}

impl From<&str> for MaterialName {
    fn from(name: &str) -> Self {
        MaterialName(name.to_owned())
    }
}

impl Surface for MaterialName {
    const MODE: Mode = Mode::Dynamic;

    fn read_from<R>(reader: &mut R) -> Result<Self, Err>
        where R: ByteReader
    {
        let len = reader.read_u8()?;
        let bytes = reader.read_bytes(len as usize)?;
        String::from_utf8(bytes)
            .map(MaterialName)
            .map_err(|_| Err::NonUtf8MaterialName)
    }

    fn validate(&self) -> Result<(), Err> {
        Self::check_len(&self.0).map(|_| ())
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<(), Err>
        where W: ByteWriter
    {
        let len = Self::check_len(&self.0)?;
        writer.write_u8(len);
        writer.write_bytes(self.0.as_bytes());
        Ok(())
    }

    fn material_name(&self, _palette: &mut Palette) -> String {
        self.0.clone()
    }

    fn from_material(name: &str, _library: &MaterialLibrary) -> Result<Self, Err> {
        Self::check_len(name)?;
        Ok(MaterialName(name.to_owned()))
    }
}

/// One decoded record.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex<S> {
    pub position: Vec3,
    pub normal: Vec3,
    pub surface: S,
}

impl<S: Surface> Vertex<S> {
    pub fn new(position: impl Into<Vec3>, normal: impl Into<Vec3>, surface: S) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            surface,
        }
    }

    pub(crate) fn read_from<R>(reader: &mut R) -> Result<Self, Err>
        where R: ByteReader
    {
        let position = read_vec3(reader)?;
        let normal = read_vec3(reader)?;
        let surface = S::read_from(reader)?;
        Ok(Self { position, normal, surface })
    }
}

pub(crate) fn read_vec3<R>(reader: &mut R) -> Result<Vec3, ReaderErr>
    where R: ByteReader
{
    Ok(Vec3::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?))
}

pub(crate) fn write_vec3<W>(v: Vec3, writer: &mut W)
    where W: ByteWriter
{
    for i in 0..3 {
        writer.write_f32(v[i]);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_str() {
        assert_eq!("static".parse::<Mode>(), Ok(Mode::Static));
        assert_eq!("dynamic".parse::<Mode>(), Ok(Mode::Dynamic));
        assert_eq!("Static".parse::<Mode>(), Err(Err::InvalidMode("Static".to_owned())));
        assert_eq!(Mode::Dynamic.to_string(), "dynamic");
    }

    #[test]
    fn name_length_limit() {
        let mut buffer = Vec::new();
        MaterialName("a".repeat(255)).write_to(&mut buffer).unwrap();
        assert_eq!(buffer.len(), 256);
        assert_eq!(buffer[0], 255);

        let mut buffer = Vec::new();
        let err = MaterialName("a".repeat(256)).write_to(&mut buffer).unwrap_err();
        assert_eq!(err, Err::MaterialNameTooLong(256));
        assert!(buffer.is_empty());

        let library = MaterialLibrary::new();
        assert_eq!(
            MaterialName::from_material(&"b".repeat(256), &library),
            Err(Err::MaterialNameTooLong(256))
        );
    }

    #[test]
    fn color_from_material() {
        let mut library = MaterialLibrary::new();
        library.insert("red", Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(
            Color::from_material("red", &library),
            Ok(Color(Vec3::new(1.0, 0.0, 0.0)))
        );
        assert_eq!(
            Color::from_material("blue", &library),
            Err(Err::UnknownMaterial("blue".to_owned()))
        );
    }

    #[test]
    fn non_utf8_name() {
        let buffer = vec![2_u8, 0xff, 0xfe];
        let mut reader = buffer.into_iter();
        assert_eq!(MaterialName::read_from(&mut reader), Err(Err::NonUtf8MaterialName));
    }
}
