//! `preconcat targets`: list configured targets with their merged options.

use std::io::Write;

use clap::Args;
use preconcat_core::config::ResolvedTarget;
use serde::Serialize;

use super::Project;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `preconcat targets`.
#[derive(Args, Debug, Default)]
pub struct TargetsArgs {}

#[derive(Debug, Serialize)]
struct TargetsOutput {
    targets: Vec<ResolvedTarget>,
}

/// Execute `preconcat targets`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_targets(
    _args: &TargetsArgs,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let payload = TargetsOutput {
        targets: project.config.resolved_targets(),
    };
    render_mode(output, &payload, render_targets_text, render_targets_pretty)
}

fn render_targets_text(payload: &TargetsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for target in &payload.targets {
        writeln!(w, "{}", target.name)?;
    }
    Ok(())
}

fn render_targets_pretty(payload: &TargetsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.targets.is_empty() {
        writeln!(w, "No targets configured.")?;
        return Ok(());
    }

    for (idx, target) in payload.targets.iter().enumerate() {
        if idx > 0 {
            writeln!(w)?;
        }
        pretty_section(w, &target.name)?;
        pretty_kv(w, "src", target.src.join(" "))?;
        pretty_kv(w, "dest", target.dest.as_deref().unwrap_or("-"))?;
        pretty_kv(w, "root_dir", &target.root_dir)?;
        pretty_kv(w, "separator", format!("{:?}", target.separator))?;
        pretty_kv(w, "duplicates", format!("{:?}", target.duplicate_ids).to_lowercase())?;
    }
    Ok(())
}
