//! # greenhoused — greenhouse daemon
//!
//! Composition root that wires all adapters together and runs until Ctrl-C.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing`
//! - Open storage and construct units and sensors from connection strings
//! - Construct the scheduler, one controller per unit and the sensor monitor
//! - Issue the configured startup schedules
//! - Shut down cleanly: cancel pending actions, switch units off, stop polling
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod connect;

use std::sync::Arc;

use anyhow::Context;
use greenhouse_app::controller::Controller;
use greenhouse_app::monitor::Monitor;
use greenhouse_app::ports::Logger;
use greenhouse_app::scheduler::Scheduler;
use greenhouse_domain::log::LogLevel;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, UnitKind};
use crate::connect::{SharedStorage, UnitController};

/// Readings buffered between the sensors and storage.
const MONITOR_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid logging filter: {}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let storage = connect::storage(&config.storage.url).context("error creating storage")?;
    let thermometer =
        connect::thermometer(&config.sensors.thermometer).context("error creating thermometer")?;
    let hygrometer =
        connect::hygrometer(&config.sensors.hygrometer).context("error creating hygrometer")?;
    startup_log(&storage, "sensors startup").await?;

    let scheduler = Scheduler::new();
    let water = controller(&config, UnitKind::Water, &storage, &scheduler).await?;
    let fan = controller(&config, UnitKind::Fan, &storage, &scheduler).await?;
    startup_log(&storage, "unit controller startup").await?;

    let mut monitor = Monitor::new(
        Arc::clone(&storage),
        config.sensor_frequency(),
        MONITOR_CAPACITY,
    );
    monitor.watch(thermometer);
    monitor.watch(hygrometer);
    monitor.start();
    startup_log(&storage, "sensor monitor startup").await?;

    for entry in &config.schedule {
        let target = match entry.unit {
            UnitKind::Water => &water,
            UnitKind::Fan => &fan,
        };
        tracing::info!(
            unit = %entry.unit,
            delay_secs = entry.delay_secs,
            duration_secs = entry.duration_secs,
            "applying startup schedule"
        );
        target.turn_unit_on(entry.delay(), entry.duration()).await;
    }

    tracing::info!("greenhoused running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!(pending = scheduler.len(), "shutting down");
    scheduler.cancel_all();
    water.turn_unit_off().await;
    fan.turn_unit_off().await;
    monitor.stop();

    Ok(())
}

async fn controller(
    config: &Config,
    kind: UnitKind,
    storage: &SharedStorage,
    scheduler: &Scheduler,
) -> anyhow::Result<UnitController> {
    let unit = connect::unit(kind, config.unit_connection(kind), Arc::clone(storage))
        .with_context(|| format!("error creating {kind} unit"))?;
    Controller::new(unit, Arc::clone(storage), scheduler.clone())
        .await
        .with_context(|| format!("unable to start {kind} controller"))
}

async fn startup_log(storage: &SharedStorage, message: &str) -> anyhow::Result<()> {
    storage
        .log(LogLevel::Info, message.to_string())
        .await
        .with_context(|| format!("error logging {message}"))?;
    Ok(())
}
