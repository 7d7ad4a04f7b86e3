//! Import entry point: package to model to scene

use crate::config::ImportConfig;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::opc::StagedPackage;
use crate::parser;
use crate::scene::{ContentSink, SceneEmitter};
use std::path::PathBuf;

/// Imports 3MF packages from local files
///
/// # Example
///
/// ```no_run
/// use lib3mf_import::{ImportConfig, Importer, X3dWriter};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let importer = Importer::new(ImportConfig::new().with_cleanup(true));
/// let mut x3d = X3dWriter::new(std::io::stdout());
/// importer.import("file:///models/bracket.3mf", &mut x3d)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    /// Create an importer with the given configuration
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// The importer's configuration
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Stage the package at `url` and parse its model document
    ///
    /// I/O and archive failures are wrapped in [`Error::Import`] carrying
    /// `url`; format and parse errors are returned as they are.
    pub fn read_model(&self, url: &str) -> Result<Model> {
        let (model, staged) = self.stage_and_parse(url)?;
        if self.config.cleanup() {
            staged.remove().map_err(|e| Error::import(url, e))?;
        }
        Ok(model)
    }

    /// Import the package at `url` into `sink`
    ///
    /// The whole model is parsed and every build item resolved before the
    /// sink receives its first call; on failure the sink sees nothing.
    pub fn import<S: ContentSink + ?Sized>(&self, url: &str, sink: &mut S) -> Result<()> {
        log::info!("Importing 3MF package {}", url);
        let (model, staged) = self.stage_and_parse(url)?;
        SceneEmitter::new(sink).emit(url, &model)?;
        if self.config.cleanup() {
            staged.remove().map_err(|e| Error::import(url, e))?;
        }
        log::info!(
            "Imported {} ({} resource(s), {} build item(s))",
            url,
            model.resources().len(),
            model.build().map_or(0, |b| b.items.len())
        );
        Ok(())
    }

    fn stage_and_parse(&self, url: &str) -> Result<(Model, StagedPackage)> {
        let path = source_path(url)?;
        let staged = StagedPackage::stage_file(&path, self.config.staging_root())
            .map_err(|e| wrap_io(url, e))?;

        let Some(model_path) = staged.model_path() else {
            return Err(Error::invalid_format_context(
                "Package",
                &format!(
                    "no relationship of type {} in {}",
                    crate::opc::MODEL_REL_TYPE,
                    crate::opc::RELS_PATH
                ),
            ));
        };
        if !model_path.is_file() {
            return Err(Error::import(
                url,
                Error::MissingFile(model_path.display().to_string()),
            ));
        }

        let model = parser::parse_model_file(model_path).map_err(|e| wrap_io(url, e))?;
        Ok((model, staged))
    }
}

fn wrap_io(url: &str, err: Error) -> Error {
    if err.is_io() {
        Error::import(url, err)
    } else {
        err
    }
}

/// Local path named by an import URL
///
/// Plain paths and `file:` URLs (`file:/a.3mf`, `file:///a.3mf`,
/// `file://localhost/a.3mf`) are accepted. Percent-encoded characters in a
/// `file:` URL are decoded.
pub fn source_path(url: &str) -> Result<PathBuf> {
    let Some((scheme, rest)) = split_scheme(url) else {
        return Ok(PathBuf::from(url));
    };
    if !scheme.eq_ignore_ascii_case("file") {
        return Err(Error::Unsupported(format!(
            "'{}': only local files can be imported",
            url
        )));
    }

    let path = match rest.strip_prefix("//") {
        Some(authority_and_path) => {
            let (host, path) = match authority_and_path.find('/') {
                Some(pos) => authority_and_path.split_at(pos),
                None => (authority_and_path, ""),
            };
            if !host.is_empty() && !host.eq_ignore_ascii_case("localhost") {
                return Err(Error::Unsupported(format!(
                    "'{}': files on remote host '{}' cannot be imported",
                    url, host
                )));
            }
            path
        }
        None => rest,
    };

    let decoded = urlencoding::decode(path)
        .map_err(|e| Error::Unsupported(format!("'{}': invalid file URL: {}", url, e)))?;
    Ok(PathBuf::from(decoded.into_owned()))
}

/// Split a URL into scheme and remainder
///
/// A single-letter scheme is treated as a Windows drive letter, not a scheme.
fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}
