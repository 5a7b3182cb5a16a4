//! raise-datasets - List datasets from the RAISE marketplace
//!
//! Builds the service once, runs a single listing request through the same
//! boundary a web host would use, and prints the result.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

use raise_datasets::api::{self, ApiResponse};
use raise_datasets::cli::{Cli, OutputFormat};
use raise_datasets::data::{DatasetService, ResultPage};
use raise_datasets::render;

/// Sets up the global subscriber; logs go to stderr so stdout stays clean
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_response(
    response: &ApiResponse,
    format: OutputFormat,
    page: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response.body)?);
        }
        OutputFormat::Text if response.is_success() => {
            let page: ResultPage = serde_json::from_value(response.body.clone())?;
            print!("{}", render::render_text(&page));
        }
        OutputFormat::Text => {
            eprint!("{}", render::render_error(page));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // Composition root: one service, passed explicitly
    let service = DatasetService::from_config(cli.service_config())?;
    debug!(endpoint = %service.config().endpoint, "service ready");

    let params = cli.params();
    let page = params.to_query(service.config().default_per_page).page();
    let response = api::get_datasets(&service, &params).await;
    print_response(&response, cli.format, page)?;

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
