use std::io::ErrorKind;
use std::path::Path;

use tera::{Context, Tera};
use tokio::fs;

use crate::config::InputConfig;
use crate::document::Document;
use crate::error::Error;

const PAGE_TEMPLATE: &str = "page";
const HOME_TEMPLATE: &str = "home";

/// The bundled page template, used when no template file is configured.
const DEFAULT_PAGE_TEMPLATE: &str = include_str!("../../templates/default.md.tera");

/// Tera wrapper holding the page template and, when configured, the
/// versioning strategy's home-page template.
///
/// Templates are compiled once per render call and rendered per context.
#[derive(Debug)]
pub(crate) struct TemplateEngine {
    tera: Tera,
    has_home: bool,
}

impl TemplateEngine {
    /// Compiles the configured templates.
    pub(crate) async fn load(input: &InputConfig) -> Result<Self, Error> {
        let mut tera = Tera::default();

        let page = match &input.template_file {
            Some(path) => read_template(path).await?,
            None => DEFAULT_PAGE_TEMPLATE.to_string(),
        };
        tera.add_raw_template(PAGE_TEMPLATE, &page)?;

        let has_home = match &input.home_template_file {
            Some(path) => {
                let home = read_template(path).await?;
                tera.add_raw_template(HOME_TEMPLATE, &home)?;
                true
            }
            None => false,
        };

        Ok(Self { tera, has_home })
    }

    /// Renders the page template with `document` as context.
    pub(crate) fn render_page(&self, document: &Document) -> Result<String, Error> {
        self.render(PAGE_TEMPLATE, document)
    }

    /// Renders the home template with `document` as context.
    pub(crate) fn render_home(&self, document: &Document) -> Result<String, Error> {
        self.render(HOME_TEMPLATE, document)
    }

    /// Whether a home template is configured.
    pub(crate) fn has_home(&self) -> bool {
        self.has_home
    }

    fn render(&self, template: &str, document: &Document) -> Result<String, Error> {
        let context = Context::from_serialize(document)?;
        Ok(self.tera.render(template, &context)?)
    }
}

async fn read_template(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            Error::TemplateNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(source)
        }
    })
}
