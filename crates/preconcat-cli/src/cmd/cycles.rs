//! `preconcat cycles`: list dependency cycles without failing on them.

use std::io::Write;

use clap::Args;
use preconcat_core::Cycle;
use serde::Serialize;

use super::{Project, TargetArgs, load_target};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `preconcat cycles`.
#[derive(Args, Debug, Default)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    target: String,
    cycles: Vec<Cycle>,
}

/// Execute `preconcat cycles`. Returns `true` if any cycle was found.
///
/// # Errors
///
/// Fails on resolution, discovery or unresolved dependencies.
pub fn run_cycles(
    args: &CyclesArgs,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<bool> {
    let loaded = load_target(project, args.target.resolve(&project.config)?)?;
    let payload = CyclesOutput {
        target: loaded.target.name,
        cycles: loaded.graph.detect_cycles(),
    };

    render_mode(output, &payload, render_cycles_text, render_cycles_pretty)?;
    Ok(!payload.cycles.is_empty())
}

fn render_cycles_text(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for cycle in &payload.cycles {
        writeln!(w, "{cycle}")?;
    }
    Ok(())
}

fn render_cycles_pretty(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No dependency cycles found in {}.", payload.target)?;
        return Ok(());
    }

    pretty_section(
        w,
        &format!("Dependency cycles in {} ({})", payload.target, payload.cycles.len()),
    )?;
    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "{:>3}) {cycle}", idx + 1)?;
    }
    Ok(())
}
