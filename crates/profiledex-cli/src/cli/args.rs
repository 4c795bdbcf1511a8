use std::path::PathBuf;

use clap::Args;

use profiledex_core::{GridSize, SortField};

use super::parsers::{parse_grid_size, parse_sort_field};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Fuzzy query over name, traits, work, hair color and bra size.
    #[arg(short = 'q', long)]
    pub search: Option<String>,
    /// Keep only fictional (`true`) or real (`false`) profiles.
    #[arg(long)]
    pub fictional: Option<bool>,
    /// Keep profiles whose traits contain this text.
    #[arg(long = "trait", value_name = "TEXT")]
    pub trait_contains: Option<String>,
    /// Keep profiles with exactly this hair color.
    #[arg(long)]
    pub hair_color: Option<String>,
    #[arg(long, default_value = "name", value_parser = parse_sort_field)]
    pub sort: SortField,
    #[arg(long, default_value_t = false)]
    pub desc: bool,
}

#[derive(Debug, Args)]
pub struct IdArg {
    pub id: String,
}

/// Every field flag; `--json` replaces all of them.
const FIELD_FLAGS: [&str; 21] = [
    "name",
    "photo_url",
    "bra_size",
    "bust",
    "waist",
    "hips",
    "underbust",
    "height",
    "weight",
    "hair_color",
    "metric",
    "traits",
    "fictional",
    "instagram",
    "twitter",
    "tiktok",
    "threads",
    "work",
    "wiki_url",
    "babepedia",
    "notes",
];

/// Profile fields for `add` and `edit`. Either `--json` or individual flags.
#[derive(Debug, Default, Args)]
pub struct ProfileInputArgs {
    /// Read a wire-format record from a file, or `-` for stdin.
    #[arg(long, value_name = "FILE", conflicts_with_all = FIELD_FLAGS)]
    pub json: Option<PathBuf>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub photo_url: Option<String>,
    #[arg(long)]
    pub bra_size: Option<String>,
    #[arg(long)]
    pub bust: Option<f64>,
    #[arg(long)]
    pub waist: Option<f64>,
    #[arg(long)]
    pub hips: Option<f64>,
    #[arg(long)]
    pub underbust: Option<f64>,
    #[arg(long)]
    pub height: Option<f64>,
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub hair_color: Option<String>,
    /// Measurements are in centimeters.
    #[arg(long)]
    pub metric: Option<bool>,
    /// `;`-separated trait list, e.g. `idol;actress`.
    #[arg(long)]
    pub traits: Option<String>,
    #[arg(long)]
    pub fictional: Option<bool>,
    #[arg(long)]
    pub instagram: Option<String>,
    #[arg(long)]
    pub twitter: Option<String>,
    #[arg(long)]
    pub tiktok: Option<String>,
    #[arg(long)]
    pub threads: Option<String>,
    #[arg(long)]
    pub work: Option<String>,
    #[arg(long)]
    pub wiki_url: Option<String>,
    #[arg(long)]
    pub babepedia: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    /// With `--json` the record is replaced; flags are merged onto the
    /// current record.
    #[command(flatten)]
    pub input: ProfileInputArgs,
}

#[derive(Debug, Args)]
pub struct GridArgs {
    /// New column count (1-4). Prints the current value when omitted.
    #[arg(value_parser = parse_grid_size)]
    pub size: Option<GridSize>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// JSON file holding one record or an array of records, or `-` for stdin.
    pub input: PathBuf,
    /// Write the result here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WebArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}
