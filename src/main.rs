#![deny(warnings)]

use commute_forecast::context::PredictionContext;
use commute_forecast::logging::*;
use commute_forecast::{Result, config, web};

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up");
    debug!(log, "log level check");

    match run(&log).await {
        Ok(_) => info!(log, "shutting down"),
        Err(err) => {
            crit!(log, "shutting down"; "error" => format!("{err:#}"));
            std::process::exit(1);
        }
    }
}

async fn run(log: &Logger) -> Result<()> {
    let context = PredictionContext::load()?;
    info!(log, "prediction context ready";
        "congestion_rows" => context.tables.congestion.len(),
        "weather_rows" => context.tables.weather.len(),
        "crash_rows" => context.tables.crashes.len(),
        "regions" => context.regions.len(),
    );

    let bind_address = config::get("SERVER_BIND_ADDRESS")?;
    let origins: Vec<String> = config::get_optional("CORS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::to_owned)
        .collect();
    web::run(context, &bind_address, &origins).await
}
