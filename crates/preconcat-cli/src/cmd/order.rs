//! `preconcat order`: print the build order of a target.

use std::io::Write;

use clap::Args;
use preconcat_core::Node;
use preconcat_core::graph::export::order_fingerprint;
use serde::Serialize;

use super::{Project, TargetArgs, load_target};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `preconcat order`.
#[derive(Args, Debug, Default)]
pub struct OrderArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Order every configured target.
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderEntry {
    pub id: String,
    pub file_path: String,
}

/// The concat configuration a target resolves to.
#[derive(Debug, Serialize)]
pub struct OrderOutput {
    pub target: String,
    pub src: Vec<String>,
    pub dest: Option<String>,
    pub nodes: Vec<OrderEntry>,
    pub fingerprint: String,
}

impl OrderOutput {
    #[must_use]
    pub fn new(target: String, dest: Option<String>, order: &[&Node]) -> Self {
        Self {
            target,
            src: order.iter().map(|node| node.file_path.clone()).collect(),
            dest,
            nodes: order
                .iter()
                .map(|node| OrderEntry {
                    id: node.id.clone(),
                    file_path: node.file_path.clone(),
                })
                .collect(),
            fingerprint: order_fingerprint(order),
        }
    }
}

/// Execute `preconcat order`.
///
/// # Errors
///
/// Fails on target resolution, discovery, graph validation or ordering.
pub fn run_order(args: &OrderArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let mut outputs = Vec::new();
    for target in args.target.select(&project.config, args.all)? {
        let loaded = load_target(project, target)?;
        let order = loaded.graph.sort()?;
        outputs.push(OrderOutput::new(
            loaded.target.name.clone(),
            loaded.target.dest.clone(),
            &order,
        ));
    }

    if args.all {
        render_mode(
            output,
            &outputs,
            |all, w| render_all_text(all, w),
            |all, w| render_all_pretty(all, w),
        )
    } else {
        let single = outputs.pop().ok_or_else(|| anyhow::anyhow!("no target ordered"))?;
        render_mode(output, &single, render_order_text, render_order_pretty)
    }
}

fn render_order_text(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for path in &payload.src {
        writeln!(w, "{path}")?;
    }
    Ok(())
}

fn render_order_pretty(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!("Build order: {} ({} files)", payload.target, payload.nodes.len()),
    )?;
    if payload.nodes.is_empty() {
        writeln!(w, "No source files matched.")?;
    }
    let width = payload.nodes.iter().map(|n| n.id.len()).max().unwrap_or(0);
    for (idx, node) in payload.nodes.iter().enumerate() {
        writeln!(w, "{:>3}. {:<width$}  {}", idx + 1, node.id, node.file_path)?;
    }
    if let Some(dest) = &payload.dest {
        writeln!(w, "\ndest:        {dest}")?;
    } else {
        writeln!(w)?;
    }
    writeln!(w, "fingerprint: {}", payload.fingerprint)
}

fn render_all_text(payloads: &[OrderOutput], w: &mut dyn Write) -> std::io::Result<()> {
    for payload in payloads {
        writeln!(w, "[{}]", payload.target)?;
        render_order_text(payload, w)?;
    }
    Ok(())
}

fn render_all_pretty(payloads: &[OrderOutput], w: &mut dyn Write) -> std::io::Result<()> {
    for (idx, payload) in payloads.iter().enumerate() {
        if idx > 0 {
            writeln!(w)?;
        }
        render_order_pretty(payload, w)?;
    }
    Ok(())
}
