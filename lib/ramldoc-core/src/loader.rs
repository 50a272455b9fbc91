use std::future::Future;
use std::path::Path;

use futures::future;
use tokio::fs;
use tracing::debug;

use crate::config::InputConfig;
use crate::document::Document;
use crate::error::Error;
use crate::listing;

/// The external definition-parsing collaborator.
///
/// [`parse`](crate::parse) drives the bundled [`RamlParser`]; use
/// [`parse_with`](crate::parse_with) or [`render_with`](crate::render_with)
/// to plug in a different parser, e.g. one delegating to a full RAML
/// resolver that expands traits and resource types before handing back the
/// document tree.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
///
/// use ramldoc_core::{DefinitionParser, Document, Error};
///
/// #[derive(Debug)]
/// struct FixtureParser;
///
/// impl DefinitionParser for FixtureParser {
///     async fn parse_file(&self, _path: &Path) -> Result<Document, Error> {
///         Ok(Document::from(serde_json::json!({"title": "Fixture"})))
///     }
/// }
/// ```
pub trait DefinitionParser: Send + Sync {
    /// Parses one definition file into a document tree.
    fn parse_file(&self, path: &Path) -> impl Future<Output = Result<Document, Error>> + Send;
}

/// The bundled parser: reads a RAML file as YAML.
///
/// The file must carry the `#%RAML` comment header; the body is parsed as
/// YAML into the document tree. Mapping keys that are not strings (status
/// codes, for instance) are stringified. This parser expects definitions in
/// the expanded object-tree form, with `resources`/`methods`/`responses`
/// collections; it does not resolve RAML traits, resource types or includes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RamlParser;

impl DefinitionParser for RamlParser {
    async fn parse_file(&self, path: &Path) -> Result<Document, Error> {
        let contents = fs::read_to_string(path).await?;
        if !contents.trim_start().starts_with("#%RAML") {
            return Err(Error::InvalidDefinition {
                path: path.to_path_buf(),
            });
        }
        let value: serde_yaml::Value =
            serde_yaml::from_str(&contents).map_err(|source| Error::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Document::from(yaml_to_json(value)))
    }
}

/// Converts a YAML value into a JSON value, stringifying mapping keys.
fn yaml_to_json(value: serde_yaml::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(flag) => Json::Bool(flag),
        Yaml::Number(number) => {
            if let Some(int) = number.as_i64() {
                Json::from(int)
            } else if let Some(int) = number.as_u64() {
                Json::from(int)
            } else {
                number
                    .as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        Yaml::String(text) => Json::String(text),
        Yaml::Sequence(items) => Json::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Json::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (yaml_key_to_string(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(text) => text,
        serde_yaml::Value::Number(number) => number.to_string(),
        serde_yaml::Value::Bool(flag) => flag.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Loads and parses every configured input path.
///
/// Returns one inner sequence per input path, containing the parsed
/// documents for the files discovered in that path, in listing order. All
/// per-path loads run concurrently with each other, as do the file parses
/// within each path; the first failure rejects the whole load.
pub(crate) async fn load_all<P: DefinitionParser>(
    config: &InputConfig,
    parser: &P,
) -> Result<Vec<Vec<Document>>, Error> {
    let loads = config
        .paths
        .iter()
        .map(|path| load_path(path, config, parser));
    future::try_join_all(loads).await
}

async fn load_path<P: DefinitionParser>(
    path: &Path,
    config: &InputConfig,
    parser: &P,
) -> Result<Vec<Document>, Error> {
    let files = listing::list_files(path, config.recursive, &config.file_filter).await?;
    debug!(path = %path.display(), files = files.len(), "parsing definitions");
    let parses = files.iter().map(|file| parser.parse_file(file));
    future::try_join_all(parses).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("fixture written");
        path
    }

    #[tokio::test]
    async fn should_parse_a_raml_document() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write(
            &dir,
            "zoo.raml",
            "#%RAML 1.0\ntitle: Zoo API\nresources:\n  - displayName: Animals\n",
        );

        let doc = RamlParser.parse_file(&file).await?;
        assert_eq!(doc.get("title"), Some(&json!("Zoo API")));
        assert_eq!(doc.resources().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn should_reject_files_without_raml_header() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write(&dir, "plain.raml", "title: Not RAML\n");

        let result = RamlParser.parse_file(&file).await;
        assert!(matches!(result, Err(Error::InvalidDefinition { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn should_reject_malformed_yaml() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write(&dir, "broken.raml", "#%RAML 1.0\ntitle: [unclosed\n");

        let result = RamlParser.parse_file(&file).await;
        assert!(matches!(result, Err(Error::Parse { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn should_stringify_numeric_mapping_keys() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = write(
            &dir,
            "codes.raml",
            "#%RAML 1.0\nresponses:\n  200:\n    description: ok\n",
        );

        let doc = RamlParser.parse_file(&file).await?;
        assert_eq!(
            doc.get("responses").and_then(|value| value.get("200")),
            Some(&json!({"description": "ok"}))
        );
        Ok(())
    }

    #[tokio::test]
    async fn should_group_documents_per_input_path() -> anyhow::Result<()> {
        let dir_a = tempfile::tempdir()?;
        write(&dir_a, "a.raml", "#%RAML 1.0\ntitle: A\n");
        write(&dir_a, "b.raml", "#%RAML 1.0\ntitle: B\n");
        let dir_b = tempfile::tempdir()?;
        write(&dir_b, "c.raml", "#%RAML 1.0\ntitle: C\n");

        let config = InputConfig {
            paths: vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()],
            ..InputConfig::default()
        };
        let nested = load_all(&config, &RamlParser).await?;

        let titles: Vec<Vec<_>> = nested
            .iter()
            .map(|docs| {
                docs.iter()
                    .map(|doc| doc.get("title").cloned())
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(
            titles,
            vec![
                vec![Some(json!("A")), Some(json!("B"))],
                vec![Some(json!("C"))],
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn should_fail_fast_on_the_first_parse_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write(&dir, "good.raml", "#%RAML 1.0\ntitle: Good\n");
        write(&dir, "bad.raml", "#%RAML 1.0\ntitle: [unclosed\n");

        let config = InputConfig {
            paths: vec![dir.path().to_path_buf()],
            ..InputConfig::default()
        };
        let result = load_all(&config, &RamlParser).await;
        assert!(matches!(result, Err(Error::Parse { .. })));
        Ok(())
    }
}
