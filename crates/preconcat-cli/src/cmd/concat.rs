//! `preconcat concat`: write the ordered sources of a target into one file.

use std::io::Write;

use anyhow::Context;
use clap::Args;
use preconcat_core::graph::export::order_fingerprint;
use serde::Serialize;
use tracing::info;

use super::{Project, TargetArgs, load_target};
use crate::concat::{join, write_artifact};
use crate::output::{OutputMode, render};

/// Arguments for `preconcat concat`.
#[derive(Args, Debug, Default)]
pub struct ConcatArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Concatenate every configured target.
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct Artifact {
    pub target: String,
    pub dest: String,
    pub files: usize,
    pub bytes: usize,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
struct ConcatOutput {
    artifacts: Vec<Artifact>,
}

/// Execute `preconcat concat`.
///
/// Every selected target is ordered before anything is written, so a
/// failure in one target leaves every destination untouched.
///
/// # Errors
///
/// Fails on resolution, a missing destination, ordering or the write.
pub fn run_concat(
    args: &ConcatArgs,
    output: OutputMode,
    quiet: bool,
    project: &Project,
) -> anyhow::Result<()> {
    let mut pending = Vec::new();
    for target in args.target.select(&project.config, args.all)? {
        let dest = target
            .dest
            .clone()
            .with_context(|| format!("target `{}` has no dest; pass --dest", target.name))?;
        let loaded = load_target(project, target)?;
        let order = loaded.graph.sort()?;
        let content = join(&order, &loaded.sources, &loaded.target.separator);
        let artifact = Artifact {
            target: loaded.target.name.clone(),
            dest,
            files: order.len(),
            bytes: content.len(),
            fingerprint: order_fingerprint(&order),
        };
        pending.push((artifact, content));
    }

    let mut artifacts = Vec::with_capacity(pending.len());
    for (artifact, content) in pending {
        write_artifact(&project.base.join(&artifact.dest), &content)?;
        info!(
            name = %artifact.target,
            dest = %artifact.dest,
            files = artifact.files,
            "artifact written"
        );
        artifacts.push(artifact);
    }

    if quiet && !output.is_json() {
        return Ok(());
    }
    render(output, &ConcatOutput { artifacts }, render_concat_human)
}

fn render_concat_human(payload: &ConcatOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for artifact in &payload.artifacts {
        writeln!(
            w,
            "{}: wrote {} ({} files, {} bytes)",
            artifact.target, artifact.dest, artifact.files, artifact.bytes
        )?;
    }
    Ok(())
}
