use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for the trip-duration pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "trip-duration",
    version,
    about = "Clean travel data, train a duration model and report trip statistics"
)]
pub struct Cli {
    /// Location of the cleaned travel table.
    #[arg(long, global = true, value_name = "PATH")]
    pub cleaned_table: Option<PathBuf>,

    /// Location of the trained model artifact.
    #[arg(long, global = true, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// TOML file with a custom region keyword table.
    #[arg(long, global = true, value_name = "PATH")]
    pub regions: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw travel dataset and replace the cleaned table.
    Prepare(PrepareArgs),
    /// Show the row count and first rows of the current cleaned table.
    Preview,
    /// Refit the duration model from the cleaned table.
    Train,
    /// Predict trip duration, training a model first if none exists.
    Predict(PredictArgs),
    /// Mean trip duration grouped by traveler and trip attributes.
    Aggregate(AggregateArgs),
    /// Break a trip budget down and suggest savings.
    Budget(BudgetArgs),
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Path to the raw travel CSV.
    #[arg(value_name = "RAW_CSV")]
    pub dataset: PathBuf,
}

/// Values stay textual so missing and malformed input are reported, not rejected by the parser.
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, value_name = "YEARS")]
    pub age: Option<String>,

    /// Accommodation cost for the trip.
    #[arg(long, value_name = "AMOUNT")]
    pub acc_cost: Option<String>,

    /// Transportation cost for the trip.
    #[arg(long, value_name = "AMOUNT")]
    pub trans_cost: Option<String>,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Only include trips from this season.
    #[arg(long)]
    pub season: Option<String>,

    /// Only include trips to this region.
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Args, Debug)]
pub struct BudgetArgs {
    /// Trip length in days.
    #[arg(long, value_name = "DAYS")]
    pub duration: f64,

    /// Accommodation cost per day.
    #[arg(long, value_name = "AMOUNT")]
    pub acc_cost: f64,

    /// Total transportation cost.
    #[arg(long, value_name = "AMOUNT")]
    pub trans_cost: f64,
}
