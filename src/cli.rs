//! Minimal CLI: validate documents against a shape, or declare its default value.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use json_shape::{Schema, SchemaDoc, Violation};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check JSON/NDJSON documents against a declarative shape, or print the shape's default value
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document against the schema
    Validate(ValidateCmd),
    /// print the declared (default) value of the schema
    Declare(DeclareCmd),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload).
    /// A pointer that resolves to nothing is validated as an absent value;
    /// a malformed pointer (non-empty, no leading `/`) is an error.
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is validated separately.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ValidateCmd {
    /// schema document (`{"strict": bool, "shape": ...}`)
    #[arg(long, short)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    /// reject absent fields even if the schema document is lenient
    #[arg(long)]
    strict: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct DeclareCmd {
    /// schema document (`{"strict": bool, "shape": ...}`)
    #[arg(long, short)]
    schema: PathBuf,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One unit of validation. `value` is `None` when a JSON Pointer selected nothing.
#[derive(Debug, Clone)]
struct Document {
    origin: String,
    value: Option<Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        self.check_pointer()?;
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            for (origin, value) in self.parse_source(&source_path_str, &source)? {
                self.expand(origin, value, &mut out)?;
            }
        }
        debug!(documents = out.len(), "loaded input documents");
        Ok(out)
    }

    /// RFC 6901: a pointer is empty or starts with `/`. Anything else would
    /// resolve to nothing everywhere and turn every document absent.
    fn check_pointer(&self) -> Result<()> {
        if let Some(ptr) = self.json_pointer.as_deref() {
            if !ptr.is_empty() && !ptr.starts_with('/') {
                bail!("malformed JSON Pointer `{ptr}`: must be empty or start with `/`");
            }
        }
        Ok(())
    }

    fn parse_source(&self, origin: &str, source: &str) -> Result<Vec<(String, Value)>> {
        if !self.ndjson {
            let value = serde_json::from_str::<Value>(source)
                .with_context(|| format!("failed to parse JSON source file ({origin})"))?;
            return Ok(vec![(origin.to_string(), value)]);
        }
        let mut out = Vec::new();
        for (i, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_origin = format!("{origin}:{}", i + 1);
            let value = serde_json::from_str::<Value>(line)
                .with_context(|| format!("failed to parse NDJSON line ({line_origin})"))?;
            out.push((line_origin, value));
        }
        Ok(out)
    }

    /// Apply the JSON Pointer, then the jq filter.
    fn expand(&self, origin: String, value: Value, out: &mut Vec<Document>) -> Result<()> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(ptr) => match value.pointer(ptr) {
                Some(selected) => selected.clone(),
                None => {
                    debug!(%origin, ptr, "json pointer selected nothing");
                    out.push(Document { origin, value: None });
                    return Ok(());
                }
            },
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { origin, value: Some(value) }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_jaq(jq_expr, &value).with_context(|| {
                    format!("failed to apply jq expression to source ({origin})")
                })?;
                for (i, value) in results.into_iter().enumerate() {
                    out.push(Document { origin: format!("{origin}#{i}"), value: Some(value) });
                }
            }
        }
        Ok(())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Validate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let (schema, doc_strict) = load_schema(&target.schema)?;
                let strict = target.strict || doc_strict;
                let documents = target.input_settings.load_documents()?;

                let outcomes = validate_all(&schema, &documents, strict);
                let mut failures = 0usize;
                for (doc, outcome) in documents.iter().zip(&outcomes) {
                    match outcome {
                        Ok(()) => println!("{} {}", "✔".green(), doc.origin),
                        Err(error) => {
                            failures += 1;
                            println!("{} {}: {error}", "✘".red(), doc.origin);
                        }
                    }
                }
                info!(total = documents.len(), failures, strict, "validation finished");
                if failures > 0 {
                    bail!("{failures} of {} documents failed validation", documents.len());
                }
                Ok(())
            }
            Command::Declare(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let (schema, _) = load_schema(&target.schema)?;
                let value = schema
                    .declare_value()
                    .with_context(|| format!("cannot declare a value for {}", target.schema.display()))?;
                let value_src = serde_json::to_string_pretty(&value)?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &value_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{value_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_schema(path: &Path) -> Result<(Schema, bool)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read schema document ({})", path.display()))?;
    let doc = SchemaDoc::from_slice(&bytes)
        .with_context(|| format!("invalid schema document ({})", path.display()))?;
    let schema = doc
        .compile()
        .with_context(|| format!("invalid shape in schema `{}`", doc.display_name()))?;
    debug!(name = doc.display_name(), %schema, "compiled schema");
    Ok((schema, doc.strict))
}

/// One shared schema, documents checked in parallel; results keep input order.
fn validate_all(schema: &Schema, documents: &[Document], strict: bool) -> Vec<Result<(), Violation>> {
    documents
        .par_iter()
        .map(|doc| schema.validate_field(doc.value.as_ref(), strict))
        .collect()
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //
