// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod chart;
mod config;
mod drivers;
mod gui;
mod session;
mod types;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use log::info;

use crate::config::DashboardConfig;

#[derive(Parser, Debug)]
#[command(name = "steelwatch")]
#[command(about = "Structural sensor dashboard: replays one sensor channel as a live chart")]
struct Args {
    /// Sensor to display (1-based channel number)
    #[arg(long, default_value = "N")]
    id: String,

    /// CSV data file, overrides the config
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn resolve_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

// 入口函数
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = resolve_config(&args)?;
    info!(
        "sensor {} from {} (replay every {} ms)",
        args.id,
        config.data_path.display(),
        config.replay_interval_ms
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 680.0])
        .with_min_inner_size([640.0, 420.0])
        .with_title(format!("SENSOR {}", args.id));
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let sensor_id = args.id.clone();
    eframe::run_native(
        "steelwatch",
        options,
        Box::new(move |_cc| Box::new(gui::SensorApp::new(&sensor_id, &config))),
    )
    .map_err(|e| anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_defaults_to_placeholder() {
        let args = Args::parse_from(["steelwatch"]);
        assert_eq!(args.id, "N");
        assert!(args.data.is_none());
    }

    #[test]
    fn data_flag_overrides_config_path() {
        let args = Args::parse_from(["steelwatch", "--id", "3", "--data", "other.csv"]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(args.id, "3");
    }
}
