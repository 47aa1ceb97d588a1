use clap::{Parser, Subcommand};
use datascrub_core::cleaning::TextCase;
use std::path::PathBuf;

/// Datascrub - Batch data-cleaning pipeline for tabular datasets
#[derive(Parser, Debug)]
#[command(name = "datascrub")]
#[command(about = "Batch data-cleaning pipeline for tabular datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a CSV or spreadsheet file and save the result as CSV
    Clean(CleanArgs),

    /// Show the columns of an input file with their inferred types
    Inspect(InspectArgs),

    /// Show the resolved configuration and where each value comes from
    Config(ConfigArgs),
}

/// Text case selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TextNorm {
    /// Convert text to lowercase
    Lower,
    /// Convert text to uppercase
    Upper,
    /// Capitalize the first letter of every word
    Title,
}

impl From<TextNorm> for TextCase {
    fn from(value: TextNorm) -> Self {
        match value {
            TextNorm::Lower => TextCase::Lower,
            TextNorm::Upper => TextCase::Upper,
            TextNorm::Title => TextCase::Title,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Path to the input file (.csv or .xlsx)
    pub input: PathBuf,

    /// Drop rows that exactly duplicate an earlier row
    #[arg(long)]
    pub remove_duplicates: bool,

    /// JSON object mapping column to fill strategy (mean, median, mode, ffill, bfill),
    /// e.g. '{"age": "mean"}'
    #[arg(long, value_name = "JSON")]
    pub fill_strategies: Option<String>,

    /// JSON object mapping column to a literal fill value, e.g. '{"city": "Unknown"}'
    #[arg(long, value_name = "JSON")]
    pub fill_values: Option<String>,

    /// Run the normalization step
    #[arg(long)]
    pub normalize: bool,

    /// Text case applied to every text column during normalization
    #[arg(long, value_enum)]
    pub text_norm: Option<TextNorm>,

    /// Min-max scale every numeric column during normalization
    #[arg(long)]
    pub scale_nums: bool,

    /// JSON object mapping column to date format, e.g. '{"joined": "%m/%d/%Y"}'
    #[arg(long, value_name = "JSON")]
    pub date_cols: Option<String>,

    /// Validate coordinates against a boundary polygon
    #[arg(long)]
    pub check_geo: bool,

    /// Latitude column name
    #[arg(long)]
    pub lat_col: Option<String>,

    /// Longitude column name
    #[arg(long)]
    pub lon_col: Option<String>,

    /// Boundary as a JSON array of [lon, lat] pairs, or a path to a GeoJSON Polygon file
    #[arg(long, value_name = "JSON|PATH")]
    pub boundary: Option<String>,

    /// Output CSV path (defaults to cleaned_data.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Stop at the first failed step
    #[arg(long)]
    pub strict: bool,

    /// Configuration file (defaults to ./datascrub.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to the input file (.csv or .xlsx)
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration file (defaults to ./datascrub.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
