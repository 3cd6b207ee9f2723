//! # CLI Command Implementations
//!
//! Mutating commands load the snapshot, apply the change, and write the
//! snapshot back. A missing snapshot reads as an empty catalog.

use super::EdgeArgs;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use subscribe_core::formats::MAX_PERSISTENCE_PAYLOAD_SIZE;
use subscribe_core::{
    Hit, Query, SubscribeError, SubscriptionCatalog, SubscriptionKeys, snapshot_from_bytes,
    snapshot_to_bytes,
};
use tracing::{debug, info};

/// Per-invocation options shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub snapshot: &'a Path,
    pub json_mode: bool,
    pub quiet: bool,
}

fn io_err(e: std::io::Error) -> SubscribeError {
    SubscribeError::IoError(e.to_string())
}

fn print_json<W: Write>(out: &mut W, value: &serde_json::Value) -> Result<(), SubscribeError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SubscribeError::SerializationError(e.to_string()))?;
    writeln!(out, "{}", text).map_err(io_err)
}

/// Validate output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, SubscribeError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        SubscribeError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;
    if !canonical_parent.is_dir() {
        return Err(SubscribeError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| SubscribeError::IoError("Output path has no filename".to_string()))?;
    Ok(canonical_parent.join(filename))
}

// =============================================================================
// INIT COMMAND
// =============================================================================

pub fn cmd_init<W: Write>(ctx: &Context<'_>, force: bool, out: &mut W) -> Result<(), SubscribeError> {
    if ctx.snapshot.exists() && !force {
        return Err(SubscribeError::IoError(
            "Snapshot already exists. Use --force to overwrite.".to_string(),
        ));
    }
    save_catalog(&SubscriptionCatalog::new(), ctx.snapshot)?;
    info!(snapshot = %ctx.snapshot.display(), "initialized empty snapshot");

    if ctx.json_mode {
        return print_json(out, &json!({ "initialized": ctx.snapshot.to_string_lossy() }));
    }
    if !ctx.quiet {
        writeln!(out, "Initialized empty snapshot at {}", ctx.snapshot.display()).map_err(io_err)?;
    }
    Ok(())
}

// =============================================================================
// INDEX / UNINDEX COMMANDS
// =============================================================================

pub fn cmd_index<W: Write>(ctx: &Context<'_>, edge: &EdgeArgs, out: &mut W) -> Result<(), SubscribeError> {
    let mut catalog = load_catalog(ctx.snapshot)?;
    catalog.index(
        (edge.namespace.as_str(), edge.id.as_str()),
        edge.uid.as_str(),
        edge.names.as_slice(),
    )?;
    save_catalog(&catalog, ctx.snapshot)?;
    report_edge(ctx, "indexed", edge, out)
}

pub fn cmd_unindex<W: Write>(
    ctx: &Context<'_>,
    edge: &EdgeArgs,
    out: &mut W,
) -> Result<(), SubscribeError> {
    let mut catalog = load_catalog(ctx.snapshot)?;
    catalog.unindex(
        (edge.namespace.as_str(), edge.id.as_str()),
        edge.uid.as_str(),
        edge.names.as_slice(),
    )?;
    save_catalog(&catalog, ctx.snapshot)?;
    report_edge(ctx, "unindexed", edge, out)
}

fn report_edge<W: Write>(
    ctx: &Context<'_>,
    action: &str,
    edge: &EdgeArgs,
    out: &mut W,
) -> Result<(), SubscribeError> {
    info!(
        action,
        namespace = %edge.namespace,
        id = %edge.id,
        uid = %edge.uid,
        names = ?edge.names,
        "catalog updated"
    );
    if ctx.json_mode {
        let mut body = serde_json::Map::new();
        body.insert(
            action.to_string(),
            json!({
                "subscriber": [edge.namespace, edge.id],
                "uid": edge.uid,
                "names": edge.names,
            }),
        );
        return print_json(out, &serde_json::Value::Object(body));
    }
    if !ctx.quiet {
        writeln!(
            out,
            "{} ({}, {}) -> {} under {}",
            action,
            edge.namespace,
            edge.id,
            edge.uid,
            edge.names.join(", ")
        )
        .map_err(io_err)?;
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

pub fn cmd_search<W: Write>(ctx: &Context<'_>, query: &str, out: &mut W) -> Result<(), SubscribeError> {
    let query = Query::parse(query)?;
    let catalog = load_catalog(ctx.snapshot)?;
    let results = catalog.search(query)?;
    debug!(hits = results.len(), "search complete");

    if ctx.json_mode {
        let text = serde_json::to_string(&results)
            .map_err(|e| SubscribeError::SerializationError(e.to_string()))?;
        return writeln!(out, "{}", text).map_err(io_err);
    }

    if results.is_empty() && !ctx.quiet {
        writeln!(out, "No results").map_err(io_err)?;
    }
    for hit in &results {
        let written = match hit {
            Hit::Item(uid) => writeln!(out, "item {}", uid),
            Hit::Subscriber(signature) => writeln!(out, "subscriber {}", signature),
        };
        written.map_err(io_err)?;
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

pub fn cmd_status<W: Write>(ctx: &Context<'_>, out: &mut W) -> Result<(), SubscribeError> {
    let catalog = load_catalog(ctx.snapshot)?;
    let snapshot = catalog.snapshot();

    if ctx.json_mode {
        let indexes: Vec<_> = catalog
            .indexes()
            .map(|index| json!({ "name": index.name(), "edges": index.edge_count() }))
            .collect();
        return print_json(
            out,
            &json!({
                "snapshot": ctx.snapshot.to_string_lossy(),
                "index_count": catalog.index_count(),
                "edge_count": snapshot.edge_count(),
                "metadata_count": snapshot.metadata.len(),
                "indexes": indexes,
            }),
        );
    }

    writeln!(out, "Subscription Catalog Status").map_err(io_err)?;
    writeln!(out, "===========================").map_err(io_err)?;
    writeln!(out, "Snapshot: {}", ctx.snapshot.display()).map_err(io_err)?;
    writeln!(out, "Indexes:  {}", catalog.index_count()).map_err(io_err)?;
    writeln!(out, "Edges:    {}", snapshot.edge_count()).map_err(io_err)?;
    for index in catalog.indexes() {
        writeln!(out, "  {:<16} {}", index.name(), index.edge_count()).map_err(io_err)?;
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

pub fn cmd_export<W: Write>(ctx: &Context<'_>, output: &Path, out: &mut W) -> Result<(), SubscribeError> {
    let validated_output = validate_output_path(output)?;
    let catalog = load_catalog(ctx.snapshot)?;
    let data = catalog.snapshot().to_json()?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| SubscribeError::IoError(format!("Write file: {}", e)))?;
    info!(output = %validated_output.display(), bytes = data.len(), "exported catalog");

    if ctx.json_mode {
        return print_json(
            out,
            &json!({ "exported": validated_output.to_string_lossy(), "bytes": data.len() }),
        );
    }
    if !ctx.quiet {
        writeln!(out, "Exported {} bytes to {}", data.len(), validated_output.display())
            .map_err(io_err)?;
    }
    Ok(())
}

// =============================================================================
// KEY COMMAND
// =============================================================================

pub fn cmd_key<W: Write>(
    ctx: &Context<'_>,
    namespace: &str,
    id: &str,
    uid: &str,
    name: &str,
    out: &mut W,
) -> Result<(), SubscribeError> {
    let key = SubscriptionKeys::new().add(name, (namespace, id), uid)?;

    if ctx.json_mode {
        return print_json(
            out,
            &json!({ "key": key, "description": SubscriptionKeys::key_description() }),
        );
    }
    writeln!(out, "{}", key).map_err(io_err)
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Load the catalog stored at `path`, or an empty one when absent.
pub fn load_catalog(path: &Path) -> Result<SubscriptionCatalog, SubscribeError> {
    let mut catalog = SubscriptionCatalog::new();
    if !path.exists() {
        debug!(snapshot = %path.display(), "no snapshot yet, starting empty");
        return Ok(catalog);
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| SubscribeError::IoError(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_PERSISTENCE_PAYLOAD_SIZE as u64 {
        return Err(SubscribeError::IoError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let data = std::fs::read(path)
        .map_err(|e| SubscribeError::IoError(format!("Read snapshot: {}", e)))?;
    catalog.restore(snapshot_from_bytes(&data)?)?;
    Ok(catalog)
}

/// Write the catalog to `path` in the binary snapshot format.
pub fn save_catalog(catalog: &SubscriptionCatalog, path: &Path) -> Result<(), SubscribeError> {
    let data = snapshot_to_bytes(&catalog.snapshot())?;
    std::fs::write(path, &data)
        .map_err(|e| SubscribeError::IoError(format!("Write snapshot: {}", e)))?;
    debug!(snapshot = %path.display(), bytes = data.len(), "saved snapshot");
    Ok(())
}
