use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tempfile::NamedTempFile;
use objstream::core::mesh::builder;
use objstream::decode::Stream;
use objstream::io::{obj, transport};
use objstream::prelude::*;

#[derive(Parser)]
#[command(name = "objstream")]
#[command(about = "Converts binary vertex streams to and from OBJ/MTL documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a base64 vertex stream into <OUTPUT>.obj and <OUTPUT>.mtl
    Decode {
        /// Record layout: static or dynamic
        mode: Mode,

        /// Base64 text, or @path to read it from a file
        input: String,

        /// Output path without extension
        output: PathBuf,

        /// Fail on triangles whose corners disagree on their material
        #[arg(long)]
        strict: bool,

        /// Object name written to the obj document
        #[arg(long)]
        name: Option<String>,
    },

    /// Convert OBJ documents into base64 vertex streams, one per line
    Encode {
        /// Record layout: static or dynamic
        mode: Mode,

        /// Geometry documents to convert
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print a JSON summary of the mesh assembled from a base64 vertex stream
    Inspect {
        /// Record layout: static or dynamic
        mode: Mode,

        /// Base64 text, or @path to read it from a file
        input: String,

        /// Fail on triangles whose corners disagree on their material
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { mode, input, output, strict, name } => {
            let tables = assemble_input(mode, &input, strict)?;
            let mut cfg = obj::writer::Config::default();
            if let Some(name) = name {
                cfg.object_name = name;
            }
            write_outputs(&tables, &output, &cfg)?;
        }

        Commands::Encode { mode, inputs } => {
            let num_failed = encode_batch(mode, &inputs, &mut std::io::stdout().lock())?;
            if num_failed > 0 {
                anyhow::bail!("{} of {} documents failed to convert", num_failed, inputs.len());
            }
        }

        Commands::Inspect { mode, input, strict } => {
            let tables = assemble_input(mode, &input, strict)?;
            println!("{}", serde_json::to_string_pretty(&tables.summary())?);
        }
    }

    Ok(())
}

fn read_stream(input: &str) -> Result<Vec<u8>> {
    let text = match input.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        None => input.to_owned(),
    };
    Ok(transport::from_base64(&text)?)
}

fn assemble_input(mode: Mode, input: &str, strict: bool) -> Result<MeshTables> {
    let data = read_stream(input)?;
    let cfg = builder::Config { strict_face_materials: strict };
    let tables = match decode::decode_stream(&data, mode)? {
        Stream::Static(vertices) => assemble(&vertices, cfg)?,
        Stream::Dynamic(vertices) => assemble(&vertices, cfg)?,
    };
    tracing::info!(
        positions = tables.positions.len(),
        normals = tables.normals.len(),
        faces = tables.num_faces(),
        "assembled mesh"
    );
    Ok(tables)
}

/// `<output>.obj` and `<output>.mtl`. The extensions are appended to the whole file name.
fn output_paths(output: &Path) -> (PathBuf, PathBuf) {
    let with_suffix = |suffix: &str| {
        let mut path = output.as_os_str().to_owned();
        path.push(suffix);
        PathBuf::from(path)
    };
    (with_suffix(".obj"), with_suffix(".mtl"))
}

/// Writes `data` to a temporary file in `dir`, removed again unless persisted.
fn stage(dir: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {:?}", dir))?;
    file.write_all(data)
        .with_context(|| format!("Failed to write a temporary file in {:?}", dir))?;
    Ok(file)
}

/// Writes both documents or neither of them.
fn write_outputs(tables: &MeshTables, output: &Path, cfg: &obj::writer::Config) -> Result<()> {
    let (obj_path, mtl_path) = output_paths(output);
    let mtl_name = mtl_path.file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Invalid output path {:?}", output))?;

    let documents = obj::writer::write_documents(tables, mtl_name, cfg)?;

    let dir = match obj_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let obj_file = stage(dir, &documents.obj)?;
    let mtl_file = stage(dir, &documents.mtl)?;

    mtl_file.persist(&mtl_path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {:?}", mtl_path))?;
    if let Err(e) = obj_file.persist(&obj_path) {
        // the library alone is of no use
        let _ = fs::remove_file(&mtl_path);
        return Err(e.error).with_context(|| format!("Failed to write {:?}", obj_path));
    }

    tracing::info!("wrote {:?} and {:?}", obj_path, mtl_path);
    Ok(())
}

/// Converts every input, writing one base64 line per converted document to `out`.
/// A failed input is logged and skipped. Returns the number of failed inputs.
fn encode_batch<W: Write>(mode: Mode, inputs: &[PathBuf], out: &mut W) -> Result<usize> {
    let mut num_failed = 0;
    for input in inputs {
        tracing::info!("converting {:?}", input);
        match encode_file(mode, input) {
            Ok(text) => writeln!(out, "{}", text)?,
            Err(err) => {
                tracing::error!("failed to convert {:?}: {:#}", input, err);
                num_failed += 1;
            }
        }
    }
    Ok(num_failed)
}

fn encode_file(mode: Mode, path: &Path) -> Result<String> {
    let buffer = match mode {
        Mode::Static => encode_document::<Color>(path)?,
        Mode::Dynamic => encode_document::<MaterialName>(path)?,
    };
    Ok(transport::to_base64(&buffer))
}

fn encode_document<S: Surface>(path: &Path) -> Result<Vec<u8>> {
    let vertices = obj::load_obj::<S, _>(path)?;
    Ok(encode::encode_to_vec(&vertices)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_tables() -> MeshTables {
        let red = Color(Vec3::new(1.0, 0.0, 0.0));
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], red),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], red),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], red),
        ];
        assemble(&vertices, builder::Config::default()).unwrap()
    }

    #[test]
    fn extensions_are_appended() {
        let (obj_path, mtl_path) = output_paths(Path::new("out/scene.v2"));
        assert_eq!(obj_path, PathBuf::from("out/scene.v2.obj"));
        assert_eq!(mtl_path, PathBuf::from("out/scene.v2.mtl"));
    }

    #[test]
    fn writes_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("scene.v2");
        write_outputs(&triangle_tables(), &output, &obj::writer::Config::default()).unwrap();

        let obj = fs::read_to_string(dir.path().join("scene.v2.obj")).unwrap();
        assert!(obj.contains("mtllib scene.v2.mtl\n"));
        let mtl = fs::read_to_string(dir.path().join("scene.v2.mtl")).unwrap();
        assert_eq!(mtl, "newmtl material_0\nKd 1 0 0\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn failed_library_write_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("bad.mtl")).unwrap();

        let result = write_outputs(&triangle_tables(), &dir.path().join("bad"), &obj::writer::Config::default());
        assert!(result.is_err());
        assert!(!dir.path().join("bad.obj").exists());
        // only the directory that blocked the write remains
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn batch_continues_after_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.obj");
        fs::write(&good, "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nusemtl moss\nf 1//1 2//1 3//1\n").unwrap();
        let inputs = vec![dir.path().join("missing.obj"), good];

        let mut out = Vec::new();
        let num_failed = encode_batch(Mode::Dynamic, &inputs, &mut out).unwrap();
        assert_eq!(num_failed, 1);

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 1);
        let data = transport::from_base64(lines[0]).unwrap();
        // three records of 24 float bytes, a length byte and "moss"
        assert_eq!(data.len(), 3 * 29);
    }
}
