use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::DEFAULT_COMMIT_URL_BASE;
use crate::selection::Selection;

#[derive(Parser)]
#[command(name = "locmeta")]
#[command(about = "Commit history visualizer for per-line code change logs")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to the line log CSV ('-' for stdin)", default_value = "meta/loc.csv")]
    pub csv: PathBuf,

    #[arg(long, help = "Base URL that commit ids are appended to", default_value = DEFAULT_COMMIT_URL_BASE)]
    pub repo_url: String,

    #[arg(short, long, help = "Enable debug logging on stderr", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summary statistics for the whole log
    Stats {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// One summary per commit
    Commits {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Write the commit visualization page
    Plot {
        #[arg(long, short, help = "Output file", default_value = "meta.html")]
        out: PathBuf,

        #[arg(long, help = "Write only the chart as SVG")]
        svg: bool,

        #[arg(long, value_parser = parse_selection, help = "Pre-applied brush as x0,y0,x1,y1 in plot pixels")]
        select: Option<Selection>,
    },
    /// Brush a rectangle of the plot and report what falls inside
    Select {
        #[arg(long, value_parser = parse_selection, help = "Brush as x0,y0,x1,y1 in plot pixels")]
        rect: Selection,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Interactive terminal view with hover and brush selection
    #[command(alias = "ui", alias = "interactive")]
    Tui,
}

fn parse_selection(s: &str) -> std::result::Result<Selection, String> {
    s.parse::<Selection>().map_err(|e| e.to_string())
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Stats { json } => crate::report::exec_stats(&self.common, json),
            Commands::Commits { json, ndjson } => {
                crate::report::exec_commits(&self.common, json, ndjson)
            }
            Commands::Plot { out, svg, select } => {
                crate::report::exec_plot(&self.common, &out, svg, select)
            }
            Commands::Select { rect, json } => crate::report::exec_select(&self.common, rect, json),
            Commands::Tui => crate::tui::run(&self.common),
        }
    }
}
