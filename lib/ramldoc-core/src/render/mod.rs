//! Render/output dispatch: output types and file-splitting strategies.
//!
//! The dispatcher branches on two independent axes: the output type
//! (return, stdout, file) and, for file output, the splitting strategy
//! deciding how documents and resources map to an output file layout.

use tokio::io::{self, AsyncWriteExt};

use crate::config::{Config, OutputConfig, OutputType, TextFilter};
use crate::document::Document;
use crate::error::Error;

mod engine;
mod strategies;

use self::engine::TemplateEngine;

/// Separator between per-document renders: exactly two blank lines.
const DOCUMENT_SEPARATOR: &str = "\n\n\n";

/// Renders `documents` according to the output configuration.
///
/// Returns the rendered text for [`OutputType::ReturnOnly`], `None` for the
/// side-effecting output types.
pub(crate) async fn render(documents: &[Document], config: &Config) -> Result<Option<String>, Error> {
    let engine = TemplateEngine::load(&config.input).await?;

    match config.output.kind {
        OutputType::ReturnOnly => {
            let text = render_joined(documents, &engine, &config.output)?;
            Ok(Some(text))
        }
        OutputType::StdOut => {
            let text = render_joined(documents, &engine, &config.output)?;
            let mut stdout = io::stdout();
            stdout.write_all(text.as_bytes()).await?;
            stdout.flush().await?;
            Ok(None)
        }
        OutputType::File => {
            strategies::write_files(documents, &engine, &config.output).await?;
            Ok(None)
        }
    }
}

/// Renders every document through the page template and joins the results
/// with [`DOCUMENT_SEPARATOR`].
fn render_joined(
    documents: &[Document],
    engine: &TemplateEngine,
    output: &OutputConfig,
) -> Result<String, Error> {
    let mut rendered = Vec::with_capacity(documents.len());
    for document in documents {
        let text = engine.render_page(document)?;
        rendered.push(apply_text_filter(output.content_filter.as_ref(), text));
    }
    Ok(rendered.join(DOCUMENT_SEPARATOR))
}

/// Applies the output content filter, keeping the original text when the
/// filter declines to replace it.
fn apply_text_filter(filter: Option<&TextFilter>, text: String) -> String {
    match filter {
        Some(filter) => filter(&text).unwrap_or(text),
        None => text,
    }
}
