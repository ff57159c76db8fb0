//! `preconcat graph`: dump a target's dependency graph.

use std::io::Write;

use clap::Args;
use preconcat_core::graph::GraphSnapshot;

use super::{Project, TargetArgs, load_target};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `preconcat graph`.
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Emit Graphviz DOT instead of the node listing.
    #[arg(long)]
    pub dot: bool,
}

/// Execute `preconcat graph`.
///
/// # Errors
///
/// Fails on resolution, discovery or graph validation.
pub fn run_graph(args: &GraphArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let loaded = load_target(project, args.target.resolve(&project.config)?)?;

    if args.dot {
        print!("{}", loaded.graph.to_dot());
        return Ok(());
    }

    render_mode(
        output,
        &loaded.graph.snapshot(),
        render_graph_text,
        |snapshot, w| render_graph_pretty(&loaded.target.name, snapshot, w),
    )
}

fn render_graph_text(snapshot: &GraphSnapshot<'_>, w: &mut dyn Write) -> std::io::Result<()> {
    for node in &snapshot.nodes {
        if node.dependencies.is_empty() {
            writeln!(w, "{}", node.id)?;
        } else {
            writeln!(w, "{} <- {}", node.id, node.dependencies.join(", "))?;
        }
    }
    Ok(())
}

fn render_graph_pretty(
    target: &str,
    snapshot: &GraphSnapshot<'_>,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    pretty_section(w, &format!("Dependency graph: {target}"))?;
    pretty_kv(w, "files", snapshot.node_count.to_string())?;
    pretty_kv(w, "edges", snapshot.edge_count.to_string())?;
    for node in &snapshot.nodes {
        writeln!(w, "\n{}  ({})", node.id, node.file_path)?;
        for dep in &node.dependencies {
            writeln!(w, "  requires {dep}")?;
        }
    }
    Ok(())
}
