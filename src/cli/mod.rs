use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;

use crate::error::Result;
use crate::graph::analyzer::GraphAnalyzer;
use crate::graph::{Graph, ViewType};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "workgraph")]
#[command(about = "Render work-item dependency graphs as Mermaid diagrams", long_about = None)]
pub struct Cli {
    /// Path to the graph JSON document
    pub graph_file: PathBuf,
    /// View type: full, critical, or status (unrecognized values fall back
    /// to full)
    #[arg(long, default_value = "full")]
    pub view: String,
    /// Write the diagram to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Print graph statistics instead of a diagram
    #[arg(long)]
    pub stats: bool,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let graph = Graph::load(&cli.graph_file)?;
    let analyzer = GraphAnalyzer::new(&graph);

    if cli.stats {
        if cli.output.is_some() {
            output::warn("--output is ignored with --stats");
        }
        let stats = analyzer.statistics();
        println!("Graph Statistics:");
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let markup = analyzer.render(ViewType::parse(&cli.view));
    match cli.output {
        Some(path) => {
            fs::write(&path, wrap_markdown(&markup))?;
            output::info(&format!("Graph written to {}", path.display()));
        }
        None => println!("{}", markup),
    }
    Ok(())
}

fn wrap_markdown(markup: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "## Dependency Graph\n\nGenerated: {}\n\n```mermaid\n{}\n```\n",
        timestamp, markup
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_wrapper_carries_heading_and_fence() {
        let wrapped = wrap_markdown("graph TD");
        assert!(wrapped.starts_with("## Dependency Graph\n\nGenerated: "));
        assert!(wrapped.contains("```mermaid\ngraph TD\n```\n"));
    }
}
