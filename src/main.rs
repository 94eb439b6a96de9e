//! Task List Web Server
//!
//! Serves an HTML task list backed by a single SQLite table.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use task_list_web::cli::Cli;
use task_list_web::config::Config;
use task_list_web::db::Database;
use task_list_web::logging::{self, LogTarget};
use task_list_web::repository::TaskRepository;
use task_list_web::web::{self, PageRenderer, TaskListServer};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::resolve(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    debug!("Configuration: {:?}", config);

    // A database that cannot be opened does not stop the server; every
    // storage call then fails with the startup error.
    let db = match Database::open(&config.database) {
        Ok(db) => db,
        Err(e) => {
            error!(
                "Failed to open database {:?}: {}",
                config.database.path, e
            );
            Database::unavailable(e.to_string())
        }
    };

    let renderer = Arc::new(PageRenderer::new()?);
    let repo: Arc<dyn TaskRepository> = Arc::new(db.clone());
    let state = TaskListServer::new(repo, renderer, config.server.page_title.clone());

    let server = web::start_server(state, config.server.socket_addr()).await?;
    info!("Server ready at http://{}", server.addr());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    server.shutdown().await;

    if let Err(e) = db.close() {
        error!("Failed to close database: {}", e);
    }

    Ok(())
}
