use std::path::PathBuf;

use clap::{Parser, Subcommand};

use profiledex_core::BackendKind;

mod args;
mod parsers;


pub use args::{EditArgs, GridArgs, IdArg, ListArgs, NormalizeArgs, ProfileInputArgs, WebArgs};

#[derive(Debug, Parser)]
#[command(name = "profiledex")]
#[command(about = "Profile catalog with pluggable storage backends", version)]
pub struct Cli {
    /// TOML configuration file, applied before environment overrides.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the local snapshot and preferences.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend: local, static, rest, notion or memory.
    #[arg(long, global = true, value_parser = parsers::parse_backend)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Prepare the configured store.
    Init,
    /// List profiles through the search, filter and sort pipeline.
    Ls(ListArgs),
    Show(IdArg),
    Add(ProfileInputArgs),
    Edit(EditArgs),
    Rm(IdArg),
    /// Distinct traits and hair colors across the catalog.
    Facets,
    /// Show or set the grid density preference.
    Grid(GridArgs),
    /// Rewrite records into the dual-alias wire shape.
    Normalize(NormalizeArgs),
    /// Serve the HTTP API and catalog page.
    Web(WebArgs),
}
