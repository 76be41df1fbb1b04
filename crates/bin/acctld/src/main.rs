//! # acctld — acctl daemon
//!
//! Composition root that wires all adapters together and starts the
//! controller.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Open the hardware lines (simulated or sysfs GPIO)
//! - Construct application services, injecting adapters via port traits
//! - Spawn the schedule engine and serve the axum router
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It only wires things together; no control logic belongs here.

mod clock;
mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use acctl_adapter_gpio_sysfs::{Polarity, SysfsActuatorLine, SysfsSenseLine};
use acctl_adapter_http_axum::state::AppState;
use acctl_adapter_storage_sqlite_sqlx::{Database, SqliteKeyValueStore};
use acctl_adapter_virtual::SimulatedAircon;
use acctl_app::ports::{ActuatorLine, SenseLine};
use acctl_app::schedule_engine::ScheduleEngine;
use acctl_app::services::actuator::StateVerifiedActuator;
use acctl_app::services::control_service::ControlService;
use acctl_app::services::driver::PulseDriver;
use acctl_app::services::journal_service::JournalService;
use acctl_app::services::schedule_store::ScheduleStore;
use acctl_app::services::sensor::DebouncedSensor;

use crate::clock::SystemClock;
use crate::config::{Config, HardwareBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = acctl_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
        busy_timeout: config.busy_timeout(),
    }
    .build()
    .await
    .context("failed to open database")?;

    // Hardware
    match config.hardware.backend {
        HardwareBackend::Simulated => {
            tracing::warn!("using simulated hardware");
            let unit = Arc::new(SimulatedAircon::default());
            run(&config, &db, Arc::clone(&unit), unit).await
        }
        HardwareBackend::Sysfs => {
            let hw = &config.hardware;
            let button = SysfsActuatorLine::open(&hw.sysfs_root, hw.button_gpio)
                .context("failed to open button line")?;
            let sense = SysfsSenseLine::open(
                &hw.sysfs_root,
                hw.sense_gpio,
                Polarity::from_active_high(hw.sense_active_high),
            )
            .context("failed to open sense line")?;
            run(&config, &db, sense, button).await
        }
    }
}

async fn run<S, A>(config: &Config, db: &Database, sense: S, button: A) -> anyhow::Result<()>
where
    S: SenseLine + 'static,
    A: ActuatorLine + 'static,
{
    let clock = Arc::new(
        SystemClock::new(config.clock.utc_offset_minutes, config.clock.min_valid_year)
            .context("invalid clock offset")?,
    );

    let actuator = Arc::new(StateVerifiedActuator::new(
        DebouncedSensor::new(sense, config.sensor_settings()),
        PulseDriver::new(button, config.pulse_settings()),
        config.retry_policy(),
    ));
    actuator.release().await.context("failed to release button")?;
    match actuator.read_state().await {
        Ok(state) => tracing::info!(%state, "initial power state"),
        Err(err) => tracing::warn!(error = %err, "could not read initial power state"),
    }

    // Services
    let schedules = Arc::new(ScheduleStore::load(SqliteKeyValueStore::new(db.pool().clone())).await);
    let journal = Arc::new(JournalService::new(Arc::clone(&clock), config.journal.capacity));
    journal.append("controller started");
    let control = Arc::new(ControlService::new(
        Arc::clone(&actuator),
        Arc::clone(&journal),
        Arc::clone(&clock),
    ));

    // Schedule engine
    let engine = ScheduleEngine::new(Arc::clone(&schedules), actuator, Arc::clone(&journal), clock);
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(());
    let tick_interval = config.tick_interval();
    let engine_task = tokio::spawn(async move {
        engine
            .run(tick_interval, async move {
                let _ = shutdown_rx.changed().await;
            })
            .await;
    });

    // HTTP
    let state = AppState::from_arcs(control, schedules, journal);
    let app = acctl_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "acctld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(());
    engine_task.await?;
    tracing::info!("acctld stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
