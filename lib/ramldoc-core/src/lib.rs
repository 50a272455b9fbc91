//! # ramldoc-core
//!
//! Convert parsed RAML API definitions into rendered documentation.
//!
//! The crate exposes two operations:
//! - [`parse`] loads every configured input path, parses the matching files
//!   concurrently and returns the flattened, property-sorted document
//!   sequence.
//! - [`render`] runs [`parse`], then renders the documents through a tera
//!   template towards the configured destination: an in-memory string,
//!   standard output, or a file tree laid out by one of three splitting
//!   strategies.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ramldoc_core::{Config, FileSplitting, OutputType};
//!
//! # async fn example() -> Result<(), ramldoc_core::Error> {
//! // One markdown file per top-level resource, under docs/api/.
//! let config = Config::builder()
//!     .add_path("api/definitions")
//!     .with_recursive(true)
//!     .with_output_type(OutputType::File)
//!     .with_splitting(FileSplitting::OnePerResource)
//!     .with_output_path("docs/api")
//!     .build();
//! ramldoc_core::render(&config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ```rust,no_run
//! use ramldoc_core::Config;
//!
//! # async fn example() -> Result<(), ramldoc_core::Error> {
//! // Default output type returns the rendered text.
//! let config = Config::builder().add_path("api.raml").build();
//! let text = ramldoc_core::render(&config).await?;
//! println!("{}", text.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Content filters
//!
//! Two hooks transform content on its way through the pipeline: the input
//! content filter rewrites each parsed [`Document`] before rendering, and
//! the output content filter rewrites each rendered text. The output filter
//! returns `Option<String>`; `None` keeps the original text. By default it
//! collapses runs of 3 or more newlines to 2.
//!
//! ## Failure model
//!
//! Both operations are fallible and fail fast: the first listing, parse,
//! template or write error rejects the whole call, and a failure partway
//! through file output can leave a partially-written output directory.

mod config;
mod document;
mod error;
mod listing;
mod loader;
mod normalize;
mod render;

pub use self::config::{
    Config, ConfigBuilder, DocumentFilter, FileFilter, FileOutputConfig, FileSplitting,
    InputConfig, OutputConfig, OutputType, TextFilter,
};
pub use self::document::Document;
pub use self::error::Error;
pub use self::loader::{DefinitionParser, RamlParser};

/// Parses every configured input path into a flattened, sorted document
/// sequence using the bundled [`RamlParser`].
///
/// Files within each path are parsed concurrently, as are the paths
/// themselves; results keep listing order and the first failure rejects the
/// whole call. After flattening, the optional input content filter is
/// applied and every node's `properties` collection is sorted by
/// `displayName`.
///
/// # Errors
///
/// Fails when an input path does not exist, a file cannot be read or
/// parsed.
pub async fn parse(config: &Config) -> Result<Vec<Document>, Error> {
    parse_with(config, &RamlParser).await
}

/// Like [`parse`], with a caller-supplied [`DefinitionParser`].
pub async fn parse_with<P: DefinitionParser>(
    config: &Config,
    parser: &P,
) -> Result<Vec<Document>, Error> {
    let nested = loader::load_all(&config.input, parser).await?;
    Ok(normalize::normalize(
        nested,
        config.input.content_filter.as_ref(),
    ))
}

/// Parses, then renders towards the configured output.
///
/// Returns `Some(text)` for [`OutputType::ReturnOnly`], `None` after writing
/// to standard output or to files.
///
/// # Errors
///
/// Fails on any [`parse`] error, on template compilation or rendering
/// failures, on file output without a configured path, and on directory
/// creation or write failures.
pub async fn render(config: &Config) -> Result<Option<String>, Error> {
    render_with(config, &RamlParser).await
}

/// Like [`render`], with a caller-supplied [`DefinitionParser`].
pub async fn render_with<P: DefinitionParser>(
    config: &Config,
    parser: &P,
) -> Result<Option<String>, Error> {
    let documents = parse_with(config, parser).await?;
    render::render(&documents, config).await
}
