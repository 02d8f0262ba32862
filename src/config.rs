// src/config.rs
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::compose::Template;
use crate::error::{Error, Result};
use crate::intake::IntakeFilter;
use crate::session::{Options, Session};

/// Optional settings read from a TOML file at startup. The file is never
/// written back.
///
/// ```toml
/// include_line_numbers = true
/// include_file_tree = true
/// excluded_dirs = [".git", "target"]
/// template = """
/// {file_tree}
///
/// {scripts}
/// """
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub template: Option<String>,
    pub include_line_numbers: bool,
    pub include_file_tree: bool,
    pub excluded_dirs: Option<Vec<String>>,
    pub excluded_extensions: Option<Vec<String>>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;

        // Surface template mistakes at startup rather than on the first copy.
        if let Some(template) = &config.template {
            Template::parse(template).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        Ok(config)
    }

    pub fn options(&self) -> Options {
        Options {
            include_line_numbers: self.include_line_numbers,
            include_file_tree: self.include_file_tree,
        }
    }

    pub fn intake_filter(&self) -> IntakeFilter {
        let defaults = IntakeFilter::default();
        IntakeFilter {
            excluded_dirs: self.excluded_dirs.clone().unwrap_or(defaults.excluded_dirs),
            excluded_extensions: self
                .excluded_extensions
                .clone()
                .unwrap_or(defaults.excluded_extensions),
        }
    }

    /// A fresh session using the configured template and options.
    pub fn session(&self) -> Result<Session> {
        let template = match &self.template {
            Some(source) => Template::parse(source)?,
            None => Template::default(),
        };
        Ok(Session::new(template, self.options()))
    }
}
