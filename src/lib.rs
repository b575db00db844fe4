pub mod aggregate;
pub mod budget;
mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod predict;
pub mod regression;
mod storage;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aggregate::{AggregationFilter, AggregationReporter};
use budget::{plan_budget, BudgetInput};
use cli::{AggregateArgs, BudgetArgs, Cli, Commands, PredictArgs, PrepareArgs};
use config::PipelineConfig;
use dataset::DatasetBuilder;
use error::PipelineError;
use predict::{PredictionRequest, PredictionService};
use regression::RegressionTrainer;

pub fn run() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let outcome = resolve_config(&cli).and_then(|config| dispatch(&config, cli.command));

    let (body, code) = match outcome {
        Ok(body) => (body, ExitCode::SUCCESS),
        Err(err) => {
            error!(kind = err.kind(), "{}", err);
            (err.to_response(), ExitCode::FAILURE)
        }
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(code)
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_duration=info".into()),
        )
        .try_init();
}

/// Config problems (unreadable region file, failed validation) share the JSON error path.
fn resolve_config(cli: &Cli) -> Result<PipelineConfig, PipelineError> {
    let config = PipelineConfig::from_cli(cli)
        .and_then(|config| config.validate().map(|()| config))
        .map_err(|err| PipelineError::invalid("configuration", format!("{:#}", err)))?;
    debug!("configuration\n{}", config.summary());
    Ok(config)
}

fn dispatch(config: &PipelineConfig, command: Commands) -> Result<Value, PipelineError> {
    match command {
        Commands::Prepare(args) => handle_prepare(config, args),
        Commands::Preview => handle_preview(config),
        Commands::Train => handle_train(config),
        Commands::Predict(args) => handle_predict(config, args),
        Commands::Aggregate(args) => handle_aggregate(config, args),
        Commands::Budget(args) => handle_budget(args),
    }
}

fn handle_prepare(config: &PipelineConfig, args: PrepareArgs) -> Result<Value, PipelineError> {
    let summary = DatasetBuilder::new(config).ingest(&args.dataset)?;
    success(&summary)
}

fn handle_preview(config: &PipelineConfig) -> Result<Value, PipelineError> {
    success(&DatasetBuilder::new(config).preview()?)
}

fn handle_train(config: &PipelineConfig) -> Result<Value, PipelineError> {
    let model = RegressionTrainer::new(config).retrain()?;
    info!("training report\n{}", regression::report::render(&model));
    success(&model)
}

fn handle_predict(config: &PipelineConfig, args: PredictArgs) -> Result<Value, PipelineError> {
    let input = PredictionRequest {
        age: args.age,
        accommodation_cost: args.acc_cost,
        transportation_cost: args.trans_cost,
    }
    .into_input()?;

    let service = PredictionService::new(config);
    let status = service.ensure_model_trained()?;
    let prediction = service.predict(&input)?;

    let mut body = success(&prediction)?;
    body["model"] = json!(status);
    Ok(body)
}

fn handle_aggregate(config: &PipelineConfig, args: AggregateArgs) -> Result<Value, PipelineError> {
    let filter = AggregationFilter::new(args.season, args.region);
    let report = AggregationReporter::new(config).report(&filter)?;
    success(&report)
}

fn handle_budget(args: BudgetArgs) -> Result<Value, PipelineError> {
    let input = BudgetInput::new(args.duration, args.acc_cost, args.trans_cost)?;
    success(&plan_budget(&input))
}

/// Wraps a payload as `{"status": "success", ...fields}`.
fn success<T: Serialize>(payload: &T) -> Result<Value, PipelineError> {
    let mut body = serde_json::to_value(payload)
        .map_err(|err| PipelineError::format("<response>", err))?;
    match body.as_object_mut() {
        Some(fields) => {
            fields.insert("status".to_string(), json!("success"));
            Ok(body)
        }
        None => Ok(json!({ "status": "success", "data": body })),
    }
}
