use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ash",
    version,
    about = "Review pull-request diffs and comments in your text editor"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turn a saved API response into a review file.
    Render(RenderArgs),
    /// Print the changes between two review files as JSON lines.
    Compare(CompareArgs),
    /// Edit a review file and apply what changed.
    Review(ReviewArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Diff response (or activities page with --activities) as JSON.
    pub input: PathBuf,

    /// The input is an activities page; render the overview.
    #[arg(long)]
    pub activities: bool,

    /// Path the diff was requested for.
    #[arg(long)]
    pub path: Option<String>,

    /// Review URL for the modeline.
    #[arg(long, env = "ASH_REVIEW_URL")]
    pub url: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Review file as rendered.
    pub original: PathBuf,

    /// Review file after editing.
    pub edited: PathBuf,

    /// Both files are overview documents.
    #[arg(long)]
    pub overview: bool,

    /// Fail on malformed numbers and dates instead of ignoring them.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Review file as rendered.
    pub original: PathBuf,

    /// Use this edited file instead of opening an editor.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Editor command (defaults to config, then $VISUAL / $EDITOR).
    #[arg(long)]
    pub editor: Option<String>,

    /// Confirm every change before applying it.
    #[arg(short, long)]
    pub interactive: bool,

    /// The file is an overview document.
    #[arg(long)]
    pub overview: bool,

    /// Fail on malformed numbers and dates instead of ignoring them.
    #[arg(long)]
    pub strict: bool,
}

/// Parse CLI arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
