pub mod completions;
pub mod concat;
pub mod cycles;
pub mod graph;
pub mod order;
pub mod targets;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use preconcat_core::config::{self, ProjectConfig, ResolvedTarget, TargetConfig, TargetOptions};
use preconcat_core::{DependencyGraph, DuplicateIdPolicy, ErrorCode, SourceFile};
use tracing::{info, instrument};

use crate::discover;

/// Name given to a target assembled from command-line flags alone.
pub const AD_HOC_TARGET: &str = "(command line)";

/// Loaded project: the directory patterns resolve against and its config.
#[derive(Debug)]
pub struct Project {
    pub base: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Load the config at `config_path`, or `<base>/preconcat.toml`.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorCode::ConfigParseError`] if the file exists but is
    /// unreadable or invalid.
    pub fn load(base: &Path, config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.map_or_else(|| base.join(config::CONFIG_FILE), Path::to_path_buf);
        let config = config::load_project_config(&path).context(ErrorCode::ConfigParseError)?;
        Ok(Self {
            base: base.to_path_buf(),
            config,
        })
    }
}

/// Target selection shared by `order`, `concat`, `cycles` and `graph`.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// Configured target to use.
    pub target: Option<String>,

    /// Directory whose segments are stripped from identifiers.
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Source glob; repeat for more. A leading `!` excludes.
    #[arg(long = "src", value_name = "GLOB")]
    pub src: Vec<String>,

    /// Output file for `concat`.
    #[arg(long, value_name = "PATH")]
    pub dest: Option<String>,

    /// Text placed between concatenated files.
    #[arg(long, value_name = "TEXT")]
    pub separator: Option<String>,

    /// Fail when two files map to the same identifier.
    #[arg(long)]
    pub reject_duplicate_ids: bool,
}

impl TargetArgs {
    fn overrides(&self) -> TargetOptions {
        TargetOptions {
            root_dir: self.root.clone(),
            separator: self.separator.clone(),
            duplicate_ids: self
                .reject_duplicate_ids
                .then_some(DuplicateIdPolicy::Reject),
        }
    }

    /// Resolve the named target (or the ad-hoc one) with flag overrides applied.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorCode::TargetNotFound`] if the named target does not
    /// exist, or if no target is named and no `--src` is given.
    pub fn resolve(&self, config: &ProjectConfig) -> Result<ResolvedTarget> {
        let overrides = self.overrides();

        let Some(name) = self.target.as_deref() else {
            if self.src.is_empty() {
                return Err(anyhow::anyhow!("no target named and no --src patterns given"))
                    .context(ErrorCode::TargetNotFound);
            }
            let adhoc = TargetConfig {
                src: self.src.clone(),
                dest: self.dest.clone(),
                options: overrides,
            };
            return Ok(ResolvedTarget::resolve(AD_HOC_TARGET, &adhoc, &config.options));
        };

        let target = config
            .targets
            .get(name)
            .with_context(|| format!("unknown target `{name}`"))
            .context(ErrorCode::TargetNotFound)?;

        let mut merged = target.clone();
        merged.options = merged.options.merged_with(&overrides);
        if !self.src.is_empty() {
            merged.src.clone_from(&self.src);
        }
        if self.dest.is_some() {
            merged.dest.clone_from(&self.dest);
        }
        Ok(ResolvedTarget::resolve(name, &merged, &config.options))
    }

    /// Every configured target when `all` is set, otherwise the one
    /// [`resolve`](Self::resolve) picks.
    ///
    /// With `all`, `--root`, `--separator` and `--reject-duplicate-ids`
    /// apply to every target; `--src` and `--dest` are per-target and refused.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorCode::TargetNotFound`] if `all` is set but no
    /// targets are configured, or if a target, `--src` or `--dest` is also
    /// given.
    pub fn select(&self, config: &ProjectConfig, all: bool) -> Result<Vec<ResolvedTarget>> {
        if !all {
            return Ok(vec![self.resolve(config)?]);
        }
        if let Some(name) = &self.target {
            return Err(anyhow::anyhow!("--all cannot be combined with target `{name}`"))
                .context(ErrorCode::TargetNotFound);
        }
        if !self.src.is_empty() || self.dest.is_some() {
            return Err(anyhow::anyhow!("--all cannot be combined with --src or --dest"))
                .context(ErrorCode::TargetNotFound);
        }
        if config.targets.is_empty() {
            return Err(anyhow::anyhow!("no targets configured"))
                .context(ErrorCode::TargetNotFound);
        }
        config
            .targets
            .keys()
            .map(|name| {
                Self {
                    target: Some(name.clone()),
                    ..self.clone()
                }
                .resolve(config)
            })
            .collect()
    }
}

/// A target's sources, read and indexed.
#[derive(Debug)]
pub struct LoadedTarget {
    pub target: ResolvedTarget,
    pub sources: Vec<SourceFile>,
    pub graph: DependencyGraph,
}

/// Discover, read and index a resolved target.
///
/// # Errors
///
/// Propagates discovery, read and graph validation failures.
#[instrument(skip_all, fields(name = %target.name))]
pub fn load_target(project: &Project, target: ResolvedTarget) -> Result<LoadedTarget> {
    let paths = discover::expand_patterns(&project.base, &target.src)?;
    let sources = discover::read_sources(&project.base, &paths)?;
    let graph = DependencyGraph::build(
        target.root_segments().as_slice(),
        &sources,
        target.build_options(),
    )?;
    info!(
        files = graph.node_count(),
        edges = graph.edge_count(),
        "dependency graph built"
    );
    Ok(LoadedTarget {
        target,
        sources,
        graph,
    })
}
