//! `cesr-decode`: decode a CESR stream and print one line per value.
//!
//! Provides the logic behind the binary entry point: input loading, registry
//! selection and rendering as JSON lines or an indented text tree.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use cesr_core::{
    decode_with, CesrError, CodeTable, DecodedValue, Header, HookContext, Input, MapHooks,
    OwnedInput, Registry, ValueKind,
};
use serde::Serialize;
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("at byte {offset}: {source}")]
    Decode {
        offset: usize,
        #[source]
        source: CesrError,
    },
    #[error(transparent)]
    Cesr(#[from] CesrError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ── Options ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per decoded value.
    Json,
    /// Indented tree, one value per line.
    Text,
}

/// Bundled KERI v1 tables, or the generated tables found in `dir`.
pub fn load_registry(dir: Option<&Path>) -> Result<Arc<dyn Registry>, CliError> {
    let table = match dir {
        Some(dir) => CodeTable::from_dir(dir)?,
        None => CodeTable::keri_v1()?,
    };
    log::debug!("using code tables {table:?}");
    Ok(Arc::new(table))
}

/// Raw stream bytes, or a JSON string / byte array when `json_input` is set.
///
/// Trailing line breaks are dropped from raw input.
pub fn read_input(bytes: Vec<u8>, json_input: bool) -> Result<OwnedInput, CliError> {
    if json_input {
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        return Ok(OwnedInput::try_from(&value)?);
    }
    let mut bytes = bytes;
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    Ok(OwnedInput::Bytes(bytes))
}

// ── Rendering ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Line<'a> {
    kind: ValueKind,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    start: usize,
    length: usize,
    header: &'a Header,
    text: Cow<'a, str>,
}

fn json_line(
    input: &[u8],
    kind: ValueKind,
    context: &HookContext<'_>,
    value: &DecodedValue,
) -> Result<String, serde_json::Error> {
    let line = Line {
        kind,
        depth: context.depth,
        group: context.group.map(|group| group.selector.as_str()),
        start: value.start,
        length: value.length,
        header: &value.header,
        text: String::from_utf8_lossy(value.bytes(input)),
    };
    serde_json::to_string(&line)
}

fn text_line(kind: ValueKind, context: &HookContext<'_>, value: &DecodedValue) -> String {
    let nesting = context.depth - 1 + usize::from(context.group.is_some());
    let indent = "  ".repeat(nesting);
    let label = match &value.header {
        Header::Version(version) => {
            format!("{} {} ({} bytes)", version.protocol, version.kind, version.size)
        }
        Header::Code(code) => {
            let mut label = code.selector.clone();
            if let Some(name) = &code.name {
                label.push(' ');
                label.push_str(name);
            }
            if let Some(count) = code.count {
                label.push_str(&format!(" count={count}"));
            }
            if let Some(index) = code.index {
                label.push_str(&format!(" index={index}"));
            }
            if let Some(ondex) = code.ondex {
                label.push_str(&format!(" ondex={ondex}"));
            }
            label
        }
    };
    let kind = match kind {
        ValueKind::Serialization => "body",
        ValueKind::Frame => "frame",
        ValueKind::Group => "group",
        ValueKind::Leaf => "leaf",
    };
    format!("{indent}{kind} {label} @{}+{}", value.start, value.length)
}

/// Decodes `input` and writes one line per value to `out`.
///
/// Returns the number of values written. Values decoded before a failure are
/// written before the error is returned.
pub fn render<W: Write>(
    out: &mut W,
    input: Input<'_>,
    registry: Arc<dyn Registry>,
    format: OutputFormat,
) -> Result<usize, CliError> {
    let bytes = input.as_bytes();
    let hooks = MapHooks::new(move |kind, context: &HookContext<'_>, value: DecodedValue| match format {
        OutputFormat::Json => json_line(bytes, kind, context, &value),
        OutputFormat::Text => Ok(text_line(kind, context, &value)),
    });

    let mut decoder = decode_with(input, registry, hooks);
    let mut written = 0;
    while let Some(line) = decoder.next() {
        match line {
            Ok(line) => {
                writeln!(out, "{}", line?)?;
                written += 1;
            }
            Err(source) => {
                return Err(CliError::Decode {
                    offset: decoder.state().cursor(),
                    source,
                })
            }
        }
    }
    Ok(written)
}
