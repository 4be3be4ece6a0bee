use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shareup")]
#[command(about = "Upload files to configurable share targets", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to $SHAREUP_CONFIG or config/shareup.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload files to a target and print the resulting URLs as JSON
    Upload(UploadArgs),
    /// List the targets in the catalog
    Targets,
    /// Validate the target catalog
    Validate,
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Target id from the catalog
    #[arg(long, short)]
    pub target: String,

    /// Files to upload, as paths or file:// URIs
    #[arg(required = true)]
    pub files: Vec<String>,
}
