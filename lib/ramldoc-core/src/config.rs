use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::document::Document;

/// Default inclusion test: files ending in `.raml`.
static DEFAULT_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.raml$").expect("valid pattern"));

/// Default post-render transform: collapse 3+ consecutive newlines to 2.
static COLLAPSE_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid pattern"));

/// Pre-render transform applied to every parsed document.
pub type DocumentFilter = Arc<dyn Fn(Document) -> Document + Send + Sync>;

/// Post-render transform applied to every rendered text.
///
/// Returning `None` keeps the original text; the replacement is only used
/// when the filter produces one. This is the uniform policy everywhere a
/// content filter is invoked during output.
pub type TextFilter = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Inclusion test deciding which files under an input path are loaded.
///
/// Accepts either a pattern tested against the path string or an arbitrary
/// predicate; both are consumed through the single [`matches`](Self::matches)
/// entry point, so the components downstream of configuration never branch on
/// the filter's shape.
#[derive(Clone)]
pub enum FileFilter {
    /// A regular expression tested against the path string.
    Pattern(Regex),
    /// An arbitrary predicate over the path.
    Predicate(Arc<dyn Fn(&Path) -> bool + Send + Sync>),
}

impl FileFilter {
    /// Creates a pattern filter from a regular expression.
    pub fn pattern(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }

    /// Creates a predicate filter from a function.
    pub fn predicate(predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(predicate))
    }

    /// Whether `path` should be included.
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Pattern(pattern) => pattern.is_match(&path.to_string_lossy()),
            Self::Predicate(predicate) => predicate(path),
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::Pattern(DEFAULT_FILE_PATTERN.clone())
    }
}

impl fmt::Debug for FileFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => formatter
                .debug_tuple("Pattern")
                .field(&pattern.as_str())
                .finish(),
            Self::Predicate(_) => formatter.write_str("Predicate(..)"),
        }
    }
}

/// Output destination for rendered documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    /// Return the rendered text from [`render`](crate::render).
    #[default]
    ReturnOnly,
    /// Write the rendered text to standard output.
    StdOut,
    /// Write one or more files, laid out per [`FileSplitting`].
    File,
}

/// Policy governing how documents and resources map to output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSplitting {
    /// All documents joined into a single file.
    #[default]
    AllInOne,
    /// One file per top-level resource of every document.
    OnePerResource,
    /// Two-level nesting: version groups containing the real endpoints, one
    /// file per endpoint plus an optional home page.
    OnePerResourceVersioning,
}

/// Input-side configuration: where definitions come from and how they are
/// pre-processed.
#[derive(Clone, derive_more::Debug)]
pub struct InputConfig {
    /// Source files or directories to scan.
    pub paths: Vec<PathBuf>,
    /// Whether directory scans recurse into subdirectories.
    pub recursive: bool,
    /// Inclusion test for scanned files.
    pub file_filter: FileFilter,
    /// Template used for normal and per-resource pages; `None` selects the
    /// bundled default template.
    pub template_file: Option<PathBuf>,
    /// Template for the versioning strategy's home page; no home page is
    /// produced without it.
    pub home_template_file: Option<PathBuf>,
    /// Pre-render transform of each parsed document.
    #[debug(skip)]
    pub content_filter: Option<DocumentFilter>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            recursive: false,
            file_filter: FileFilter::default(),
            template_file: None,
            home_template_file: None,
            content_filter: None,
        }
    }
}

/// File-output configuration, consulted only for [`OutputType::File`].
#[derive(Debug, Clone)]
pub struct FileOutputConfig {
    /// File layout strategy.
    pub splitting: FileSplitting,
    /// Target file ([`FileSplitting::AllInOne`]) or directory (the
    /// per-resource strategies). Required for file output.
    pub path: Option<PathBuf>,
    /// Suffix appended to generated filenames.
    pub extension: String,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            splitting: FileSplitting::default(),
            path: None,
            extension: ".md".to_string(),
        }
    }
}

/// Output-side configuration: destination and post-render transform.
#[derive(Clone, derive_more::Debug)]
pub struct OutputConfig {
    /// Output destination.
    pub kind: OutputType,
    /// File layout, consulted for [`OutputType::File`].
    pub file: FileOutputConfig,
    /// Post-render transform of each rendered text; defaults to collapsing
    /// 3+ consecutive newlines to 2.
    #[debug(skip)]
    pub content_filter: Option<TextFilter>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            kind: OutputType::default(),
            file: FileOutputConfig::default(),
            content_filter: Some(Arc::new(collapse_newlines)),
        }
    }
}

fn collapse_newlines(text: &str) -> Option<String> {
    Some(COLLAPSE_NEWLINES.replace_all(text, "\n\n").into_owned())
}

/// Configuration for one [`parse`](crate::parse) or [`render`](crate::render)
/// call.
///
/// Immutable per call. [`Config::default()`] carries the full documented
/// default behavior; [`Config::builder()`] overlays caller choices onto a
/// fresh copy of those defaults, so the shared defaults are never mutated.
///
/// # Defaults
///
/// | Field | Default |
/// |---|---|
/// | `input.paths` | empty |
/// | `input.recursive` | `false` |
/// | `input.file_filter` | matches files ending `.raml` |
/// | `input.template_file` | bundled default template |
/// | `input.home_template_file` | none |
/// | `input.content_filter` | none |
/// | `output.kind` | [`OutputType::ReturnOnly`] |
/// | `output.file.splitting` | [`FileSplitting::AllInOne`] |
/// | `output.file.path` | none |
/// | `output.file.extension` | `.md` |
/// | `output.content_filter` | collapse 3+ consecutive newlines to 2 |
///
/// # Example
///
/// ```rust
/// use ramldoc_core::{Config, FileSplitting, OutputType};
///
/// let config = Config::builder()
///     .add_path("api/definitions")
///     .with_recursive(true)
///     .with_output_type(OutputType::File)
///     .with_splitting(FileSplitting::OnePerResource)
///     .with_output_path("docs/api")
///     .with_extension(".markdown")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Input-side configuration.
    pub input: InputConfig,
    /// Output-side configuration.
    pub output: OutputConfig,
}

impl Config {
    /// Creates a builder whose unset fields fall back to the defaults above.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
///
/// Every setter is optional; [`build`](Self::build) merges the provided
/// values over a fresh copy of the defaults.
#[derive(Default, derive_more::Debug)]
pub struct ConfigBuilder {
    paths: Option<Vec<PathBuf>>,
    recursive: Option<bool>,
    file_filter: Option<FileFilter>,
    template_file: Option<PathBuf>,
    home_template_file: Option<PathBuf>,
    #[debug(skip)]
    content_filter: Option<DocumentFilter>,
    kind: Option<OutputType>,
    splitting: Option<FileSplitting>,
    output_path: Option<PathBuf>,
    extension: Option<String>,
    #[debug(skip)]
    output_filter: Option<TextFilter>,
    clear_output_filter: bool,
}

impl ConfigBuilder {
    /// Replaces the input paths.
    pub fn with_paths(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Appends one input path.
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.get_or_insert_with(Vec::new).push(path.into());
        self
    }

    /// Whether directory scans recurse into subdirectories.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Sets the file inclusion filter.
    pub fn with_file_filter(mut self, filter: FileFilter) -> Self {
        self.file_filter = Some(filter);
        self
    }

    /// Uses `path` as the template for normal and per-resource pages.
    pub fn with_template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_file = Some(path.into());
        self
    }

    /// Uses `path` as the versioning strategy's home-page template.
    pub fn with_home_template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.home_template_file = Some(path.into());
        self
    }

    /// Applies `filter` to every parsed document before rendering.
    pub fn with_content_filter(
        mut self,
        filter: impl Fn(Document) -> Document + Send + Sync + 'static,
    ) -> Self {
        self.content_filter = Some(Arc::new(filter));
        self
    }

    /// Sets the output destination.
    pub fn with_output_type(mut self, kind: OutputType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the file layout strategy.
    pub fn with_splitting(mut self, splitting: FileSplitting) -> Self {
        self.splitting = Some(splitting);
        self
    }

    /// Sets the output file or directory.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Sets the suffix appended to generated filenames.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Applies `filter` to every rendered text; returning `None` keeps the
    /// original text.
    pub fn with_output_filter(
        mut self,
        filter: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.output_filter = Some(Arc::new(filter));
        self
    }

    /// Disables the output content filter, including the default
    /// newline-collapsing one.
    pub fn without_output_filter(mut self) -> Self {
        self.output_filter = None;
        self.clear_output_filter = true;
        self
    }

    /// Merges the provided values over a fresh copy of the defaults.
    pub fn build(self) -> Config {
        let defaults = Config::default();
        let output_filter = if self.output_filter.is_some() {
            self.output_filter
        } else if self.clear_output_filter {
            None
        } else {
            defaults.output.content_filter
        };
        Config {
            input: InputConfig {
                paths: self.paths.unwrap_or(defaults.input.paths),
                recursive: self.recursive.unwrap_or(defaults.input.recursive),
                file_filter: self.file_filter.unwrap_or(defaults.input.file_filter),
                template_file: self.template_file.or(defaults.input.template_file),
                home_template_file: self
                    .home_template_file
                    .or(defaults.input.home_template_file),
                content_filter: self.content_filter.or(defaults.input.content_filter),
            },
            output: OutputConfig {
                kind: self.kind.unwrap_or(defaults.output.kind),
                file: FileOutputConfig {
                    splitting: self.splitting.unwrap_or(defaults.output.file.splitting),
                    path: self.output_path.or(defaults.output.file.path),
                    extension: self.extension.unwrap_or(defaults.output.file.extension),
                },
                content_filter: output_filter,
            },
        }
    }
}
