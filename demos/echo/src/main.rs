// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single-service echo server, demonstrating the minimum embedding of
//! `grace`: one listener, one start callback, one shutdown callback.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use grace::{Grace, Listener, Service};
use grace_core::{Address, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut app = Grace::new(Config::default());
    app.register(Service::new("echo", Address::tcp("127.0.0.1:8124"), start_echo, shutdown_echo));

    app.run().await?;
    Ok(())
}

async fn start_echo(listener: Listener) -> Result<(), grace::BoxError> {
    info!(addr = %listener.addr(), "echo service accepting connections");
    loop {
        let conn = listener.accept().await?;
        tokio::spawn(async move {
            let mut stream = conn.stream;
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if stream.write_all(&buf[..n]).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(%err, peer = %conn.peer_addr, "echo connection read error");
                        break;
                    }
                }
            }
        });
    }
}

async fn shutdown_echo() -> Result<(), grace::BoxError> {
    info!("echo service shutting down");
    Ok(())
}
