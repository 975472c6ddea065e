mod api;
mod app;
mod config;
mod error;
mod poller;
mod store;
mod upload;
mod utils;
mod views;

use api::ApiClient;
use app::CleanStreamApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::CreationContext;
use error::{DashboardError, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DashboardConfig::parse();
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "dashboard exited with an error");
            ExitCode::FAILURE
        }
    }
}

fn run(config: DashboardConfig) -> Result<()> {
    config.validate()?;
    let api = ApiClient::new(&config.api_base, config.request_timeout())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("cleanstream-io")
        .enable_all()
        .build()?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    info!(api_base = %config.api_base, "starting CleanStream dashboard");
    eframe::run_native(
        "CleanStream Dashboard",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(CleanStreamApp::new(cc, &config, runtime, Arc::new(api)))
        }),
    )
    .map_err(|e| DashboardError::Ui(e.to_string()))
}
