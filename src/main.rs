mod config;
mod database;
mod error;
mod logger;
mod models;
mod render;
mod server;
mod timing;

use std::sync::Arc;

use anyhow::Context;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use r2d2_sqlite::SqliteConnectionManager;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use config::Config;
use database::{seed::seed_if_missing, sqlite::SqliteDatabase};
use server::server::Server;
use timing::clock::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Could not load configuration")?;
    logger::init(&config)?;

    let manager = SqliteConnectionManager::file(&config.database_path);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .with_context(|| format!("Could not open {}", config.database_path.display()))?;
    let pool = Arc::new(pool);

    {
        let connection = pool.get().context("Could not get connection for setup")?;
        SqliteDatabase::create_tables(&connection).context("Could not create tables")?;
        if let Some(seed_file) = &config.seed_file {
            seed_if_missing(&connection, &config.tenant, seed_file)
                .with_context(|| format!("Could not seed from {}", seed_file.display()))?;
        }
    }

    let clock = Arc::new(SystemClock::new(config.tz()?));
    let server = Server::setup(pool, clock, config.tenant.clone());

    let address = config.socket_address()?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Could not bind {}", address))?;
    info!(%address, tenant = %config.tenant, "listening");

    loop {
        let stream = match listener.accept().await {
            Ok((stream, _)) => stream,
            Err(err) => {
                warn!("Could not accept connection: {}", err);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server_clone = server.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, server_clone)
                .await
            {
                error!("{}", err);
            }
        });
    }
}
