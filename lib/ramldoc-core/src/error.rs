use std::path::PathBuf;

/// Errors that can occur while parsing definitions or rendering documentation.
///
/// No variant is locally recovered or retried: every error surfaces as the
/// failure of the top-level [`parse`](crate::parse) or [`render`](crate::render)
/// operation. When several file parses run concurrently, the first error wins
/// and the results of its siblings are discarded.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum Error {
    /// A configured input path does not exist on the filesystem.
    #[display("Input path does not exist: {}", path.display())]
    #[from(skip)]
    InputNotFound {
        /// The missing input path.
        path: PathBuf,
    },

    /// A source definition file could not be parsed.
    #[display("Failed to parse definition {}: {source}", path.display())]
    #[from(skip)]
    Parse {
        /// The definition file that failed to parse.
        path: PathBuf,
        /// The underlying YAML parsing error.
        source: serde_yaml::Error,
    },

    /// A file handed to the bundled parser is not a RAML definition.
    #[display("Not a RAML definition (missing #%RAML header): {}", path.display())]
    #[from(skip)]
    InvalidDefinition {
        /// The offending file.
        path: PathBuf,
    },

    /// A configured template file does not exist.
    #[display("Template file does not exist: {}", path.display())]
    #[from(skip)]
    TemplateNotFound {
        /// The missing template path.
        path: PathBuf,
    },

    /// Template compilation or rendering failed.
    ///
    /// Occurs for malformed templates and for invalid context access while
    /// rendering.
    Template(tera::Error),

    /// Filesystem access failed.
    ///
    /// Occurs when listing input directories, creating output directories or
    /// writing output files.
    Io(std::io::Error),

    /// File output was requested without a target path.
    #[display("File output requires output.file.path to be configured")]
    OutputPathRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn should_display_missing_path() {
        let error = Error::InputNotFound {
            path: PathBuf::from("/does/not/exist"),
        };
        assert_eq!(
            error.to_string(),
            "Input path does not exist: /does/not/exist"
        );
    }
}
