//! File-level conversion operations behind the CLI.
//!
//! Every output goes through a tempfile in the destination directory and is
//! renamed into place on success, so a failed conversion never leaves a
//! partially written file. Batch conversion runs one independent codec
//! session per file on the rayon pool; a failing file is reported and does
//! not affect its siblings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error};
use rayon::prelude::*;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::ast::AstArena;
use crate::decode::Unmarshaller;
use crate::encode::Marshaller;
use crate::error::{Error, Result};
use crate::parser::parse_file;
use crate::position::FileSet;
use crate::printer::print_file;
use crate::Options;

/// Parses a source file and writes its wire-tree JSON.
pub fn source_to_wire(input: &Path, output: &Path, indent: usize, options: Options) -> Result<()> {
    let src = fs::read_to_string(input)?;
    source_to_wire_content(&src, &input.to_string_lossy(), output, indent, options)
}

/// Same as [`source_to_wire`], for source text already in memory (the input
/// may have come from somewhere other than the local filesystem).
pub fn source_to_wire_content(
    src: &str,
    path: &str,
    output: &Path,
    indent: usize,
    options: Options,
) -> Result<()> {
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, path, src)?;

    let mut marshaller = Marshaller::new(options, &fset);
    let wire = marshaller.marshal_file(&arena, &file);

    let mut buf = Vec::new();
    if indent == 0 {
        serde_json::to_writer(&mut buf, &wire)?;
    } else {
        let pad = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        wire.serialize(&mut ser)?;
    }
    buf.push(b'\n');

    write_atomic(output, &buf)
}

/// Decodes a wire-tree JSON file and regenerates source text.
pub fn wire_to_source(input: &Path, output: &Path, options: Options) -> Result<()> {
    let bytes = fs::read(input)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    let decoded = Unmarshaller::new(options).unmarshal_file(&value)?;
    let text = print_file(&decoded.arena, &decoded.fset, &decoded.file);
    write_atomic(output, text.as_bytes())
}

/// Parse-and-print without the wire step: the fidelity baseline the codec
/// round trip is measured against.
pub fn reformat(input: &Path, output: &Path) -> Result<()> {
    let src = fs::read_to_string(input)?;
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, &input.to_string_lossy(), &src)?;
    let text = print_file(&arena, &fset, &file);
    write_atomic(output, text.as_bytes())
}

/// Outcome of a batch conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
}

/// Converts every `.go` file directly under `dir` into `out_dir`, one codec
/// session per file, in parallel.
pub fn convert_dir(
    dir: &Path,
    out_dir: &Path,
    indent: usize,
    options: Options,
) -> Result<BatchSummary> {
    fs::create_dir_all(out_dir)?;

    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("go")
        })
        .collect();
    inputs.sort();

    let outcomes: Vec<bool> = inputs
        .par_iter()
        .map(|input| {
            let file_name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let output = out_dir.join(format!("{file_name}.json"));
            match source_to_wire(input, &output, indent, options) {
                Ok(()) => {
                    debug!("converted {}", input.display());
                    true
                }
                Err(err) => {
                    error!("unable to convert {}: {err}", input.display());
                    false
                }
            }
        })
        .collect();

    let converted = outcomes.iter().filter(|&&ok| ok).count();
    Ok(BatchSummary {
        converted,
        failed: outcomes.len() - converted,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
