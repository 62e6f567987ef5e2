//! Interactive mode for the server.
//!
//! Prompts for the data directory, bind address and port before starting
//! the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::config::DEFAULT_PORT;
use crate::{Overrides, ServerConfig, ServerError, run_server};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Prompt answers take precedence over the configuration file and the
/// environment.
///
/// # Errors
///
/// Returns [`ServerError`] if the configuration or dataset cannot be
/// loaded, or the server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> Result<(), ServerError> {
    println!("DashBike Server");
    println!();

    let defaults = ServerConfig::resolve(None, &Overrides::default())?;

    let data_dir: String = Input::new()
        .with_prompt("Data directory")
        .default(defaults.dataset.data_dir.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| defaults.dataset.data_dir.display().to_string());

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(DEFAULT_PORT);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    let config = defaults.with_overrides(&Overrides {
        bind_addr: Some(bind_addr),
        port: Some(port),
        data_dir: Some(PathBuf::from(data_dir)),
    });

    run_server(config).await
}
