//! The three file-splitting strategies.

use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::config::{FileSplitting, OutputConfig};
use crate::document::{Document, node_display_name, node_unique_id};
use crate::error::Error;

use super::engine::TemplateEngine;
use super::{apply_text_filter, render_joined};

/// Writes `documents` to disk according to the configured splitting
/// strategy.
///
/// Writes happen sequentially in traversal order; a failure partway through
/// can leave a partially-written output directory.
pub(crate) async fn write_files(
    documents: &[Document],
    engine: &TemplateEngine,
    output: &OutputConfig,
) -> Result<(), Error> {
    let target = output
        .file
        .path
        .as_deref()
        .ok_or(Error::OutputPathRequired)?;

    match output.file.splitting {
        FileSplitting::AllInOne => all_in_one(documents, engine, output, target).await,
        FileSplitting::OnePerResource => one_per_resource(documents, engine, output, target).await,
        FileSplitting::OnePerResourceVersioning => {
            one_per_resource_versioning(documents, engine, output, target).await
        }
    }
}

/// One file holding every document, joined like the return/stdout outputs.
async fn all_in_one(
    documents: &[Document],
    engine: &TemplateEngine,
    output: &OutputConfig,
    target: &Path,
) -> Result<(), Error> {
    let text = render_joined(documents, engine, output)?;
    write_file(target, &text).await
}

/// One file per top-level resource, named `<displayName><extension>`.
async fn one_per_resource(
    documents: &[Document],
    engine: &TemplateEngine,
    output: &OutputConfig,
    target: &Path,
) -> Result<(), Error> {
    for document in documents {
        for resource in document.resources() {
            let context = document.with_single_resource(resource);
            let text = engine.render_page(&context)?;
            let text = apply_text_filter(output.content_filter.as_ref(), text);
            let name = node_display_name(resource).unwrap_or_default();
            let path = target.join(format!("{name}{}", output.file.extension));
            write_file(&path, &text).await?;
        }
    }
    Ok(())
}

/// Two-level nesting: top-level resources are version groups whose own
/// resources are the real endpoints.
///
/// Endpoints within each version group are ordered by the first character of
/// their `displayName` (ordering only, nothing is filtered by it). When a
/// home template is configured, a `Home<extension>` page is rendered once
/// per document with the full document as context; every endpoint then gets
/// its own `<displayName>_<version uniqueId><extension>` file.
async fn one_per_resource_versioning(
    documents: &[Document],
    engine: &TemplateEngine,
    output: &OutputConfig,
    target: &Path,
) -> Result<(), Error> {
    for document in documents {
        let mut document = document.clone();
        sort_version_groups(&mut document);

        if engine.has_home() {
            let text = engine.render_home(&document)?;
            let text = apply_text_filter(output.content_filter.as_ref(), text);
            let path = target.join(format!("Home{}", output.file.extension));
            write_file(&path, &text).await?;
        }

        for version in document.resources() {
            let Some(endpoints) = version.get("resources").and_then(Value::as_array) else {
                continue;
            };
            let version_id = node_unique_id(version).unwrap_or_default();
            for endpoint in endpoints {
                let context = document.with_single_resource(endpoint);
                let text = engine.render_page(&context)?;
                let text = apply_text_filter(output.content_filter.as_ref(), text);
                let name = node_display_name(endpoint).unwrap_or_default();
                let path = target.join(format!(
                    "{name}_{version_id}{}",
                    output.file.extension
                ));
                write_file(&path, &text).await?;
            }
        }
    }
    Ok(())
}

/// Sorts every version group's nested resources by the first character of
/// their `displayName`. Ties keep their relative order.
fn sort_version_groups(document: &mut Document) {
    let Some(versions) = document.get_mut("resources").and_then(Value::as_array_mut) else {
        return;
    };
    for version in versions {
        let Some(endpoints) = version.get_mut("resources").and_then(Value::as_array_mut) else {
            continue;
        };
        endpoints.sort_by(|left, right| first_char(left).cmp(&first_char(right)));
    }
}

fn first_char(node: &Value) -> Option<char> {
    node_display_name(node).and_then(|name| name.chars().next())
}

/// Unconditional-overwrite write, creating missing parent directories first.
async fn write_file(path: &Path, contents: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, contents).await?;
    info!(path = %path.display(), "wrote documentation file");
    Ok(())
}
