#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the bike accident dashboard.
//!
//! Loads the accident, population and department files once at start-up
//! and serves page layouts, the callback registry and recomputed outputs
//! as JSON. Static assets are served from the configured directory under
//! `/assets`.

pub mod config;
mod handlers;
pub mod interactive;
pub mod sessions;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use chrono::{DateTime, Utc};
use dashbike_accident_models::Column;
use dashbike_dashboard::Boundaries;
use dashbike_dataset::{DataContext, DatasetError, DatasetPaths};
use dashbike_server_models::ApiDatasetSummary;

pub use config::{ConfigError, Overrides, ServerConfig};
use sessions::SessionCache;

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state.
pub struct AppState {
    /// Loaded dataset, read-only after start-up.
    pub ctx: DataContext,
    /// Boundary collections referenced by the choropleth.
    pub boundaries: Boundaries,
    /// Cached map selections.
    pub sessions: SessionCache,
    /// When the dataset was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    #[must_use]
    pub fn new(ctx: DataContext, boundaries: Boundaries, sessions: SessionCache) -> Self {
        Self {
            ctx,
            boundaries,
            sessions,
            loaded_at: Utc::now(),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dataset", web::get().to(handlers::dataset))
            .route("/callbacks", web::get().to(handlers::callbacks))
            .route("/update", web::post().to(handlers::update))
            .route("/pages", web::get().to(handlers::page))
            .route("/layout", web::get().to(handlers::layout))
            .route(
                "/columns/{column}/values",
                web::get().to(handlers::column_values),
            )
            .route("/sessions", web::post().to(handlers::create_session))
            .route("/sessions/{id}/map", web::get().to(handlers::session_map))
            .route("/sessions/{id}", web::delete().to(handlers::delete_session)),
    );
}

/// Loads the dataset described by `paths`.
///
/// # Errors
///
/// Returns [`DatasetError`] if a file is missing or malformed.
pub fn load_context(paths: &DatasetPaths) -> Result<DataContext, DatasetError> {
    log::info!("Loading dataset from {}...", paths.data_dir.display());
    let ctx = DataContext::load(paths)?;
    if ctx.table.is_empty() {
        log::warn!("Accident file has no records");
    }
    Ok(ctx)
}

/// Summarizes a loaded dataset.
#[must_use]
pub fn summarize(ctx: &DataContext) -> ApiDatasetSummary {
    let years = ctx.table.years();
    ApiDatasetSummary {
        records: ctx.table.len(),
        years: years.first().copied().zip(years.last().copied()),
        columns: Column::all()
            .iter()
            .filter(|column| ctx.table.has_column(**column))
            .map(ToString::to_string)
            .collect(),
        departments: ctx.departments.len(),
        departments_with_population: ctx
            .departments
            .iter()
            .filter(|dep| dep.population.is_some())
            .count(),
        regions: ctx.regions.len(),
    }
}

/// Starts the dashboard API server.
///
/// Loads the dataset, then serves the API until the process is stopped.
/// The caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError`] if the dataset cannot be loaded or the HTTP
/// server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let ctx = load_context(&config.dataset)?;
    let sessions = config.session_cache();
    let state = web::Data::new(AppState::new(ctx, config.boundaries, sessions));
    let assets_dir = config.assets_dir;

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/assets", &assets_dir))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}
