//! `preconcat.toml` loading and per-target option merging.
//!
//! ```toml
//! [options]
//! root_dir = "src"
//!
//! [targets.app]
//! src = ["src/**/*.js", "!src/**/*.spec.js"]
//! dest = "dist/app.js"
//! ```
//!
//! Keys under `[options]` apply to every target; the same keys set on a
//! target override them for that target only.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::{BuildOptions, DuplicateIdPolicy};
use crate::ident;

pub const CONFIG_FILE: &str = "preconcat.toml";
pub const DEFAULT_ROOT_DIR: &str = "src";
pub const DEFAULT_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub options: TargetOptions,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

/// Options that may be set globally or per target. Unset means inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOptions {
    /// Directory whose path segments are elided from identifiers.
    #[serde(default, alias = "cwd", skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
    /// Text written between concatenated files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_ids: Option<DuplicateIdPolicy>,
}

impl TargetOptions {
    /// `self` with every field set in `over` replaced.
    #[must_use]
    pub fn merged_with(&self, over: &Self) -> Self {
        Self {
            root_dir: over.root_dir.clone().or_else(|| self.root_dir.clone()),
            separator: over.separator.clone().or_else(|| self.separator.clone()),
            duplicate_ids: over.duplicate_ids.or(self.duplicate_ids),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Ordered glob patterns; a leading `!` excludes.
    #[serde(default)]
    pub src: Vec<String>,
    #[serde(default)]
    pub dest: Option<String>,
    #[serde(flatten)]
    pub options: TargetOptions,
}

/// A target with every option resolved to a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    pub name: String,
    pub src: Vec<String>,
    pub dest: Option<String>,
    pub root_dir: String,
    pub separator: String,
    pub duplicate_ids: DuplicateIdPolicy,
}

impl ResolvedTarget {
    /// Resolve `target` against global `defaults`, then built-in defaults.
    #[must_use]
    pub fn resolve(name: &str, target: &TargetConfig, defaults: &TargetOptions) -> Self {
        let options = defaults.merged_with(&target.options);
        Self {
            name: name.to_string(),
            src: target.src.clone(),
            dest: target.dest.clone(),
            root_dir: options
                .root_dir
                .unwrap_or_else(|| DEFAULT_ROOT_DIR.to_string()),
            separator: options
                .separator
                .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
            duplicate_ids: options.duplicate_ids.unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn root_segments(&self) -> Vec<String> {
        ident::root_segments(&self.root_dir)
    }

    #[must_use]
    pub const fn build_options(&self) -> BuildOptions {
        BuildOptions {
            duplicate_ids: self.duplicate_ids,
        }
    }
}

impl ProjectConfig {
    /// Look up one target by name.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<ResolvedTarget> {
        self.targets
            .get(name)
            .map(|target| ResolvedTarget::resolve(name, target, &self.options))
    }

    /// Every target, in name order.
    #[must_use]
    pub fn resolved_targets(&self) -> Vec<ResolvedTarget> {
        self.targets
            .iter()
            .map(|(name, target)| ResolvedTarget::resolve(name, target, &self.options))
            .collect()
    }
}

/// Parse a config document.
///
/// # Errors
///
/// Returns an error if `content` is not valid TOML for [`ProjectConfig`].
pub fn parse_project_config(content: &str) -> Result<ProjectConfig> {
    toml::from_str::<ProjectConfig>(content).context("invalid preconcat config")
}

/// Load `path`, or defaults (no targets) if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
