// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two independently-addressed services sharing one master/worker pair,
//! demonstrating that inherited file descriptors preserve registration order.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use grace::{Grace, Listener, Service};
use grace_core::{Address, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut app = Grace::new(Config::builder().connection_limit(true, 256).build());

    let primary_stop = CancellationToken::new();
    let primary_stop_for_shutdown = primary_stop.clone();
    let secondary_stop = CancellationToken::new();
    let secondary_stop_for_shutdown = secondary_stop.clone();

    app.register(Service::new(
        "primary",
        Address::tcp("127.0.0.1:8124"),
        move |listener: Listener| serve(listener, "primary", primary_stop.clone()),
        move || shutdown("primary", primary_stop_for_shutdown.clone()),
    ));
    app.register(Service::new(
        "secondary",
        Address::tcp("127.0.0.1:8125"),
        move |listener: Listener| serve(listener, "secondary", secondary_stop.clone()),
        move || shutdown("secondary", secondary_stop_for_shutdown.clone()),
    ));

    app.run().await?;
    Ok(())
}

async fn serve(listener: Listener, name: &'static str, stop: CancellationToken) -> Result<(), grace::BoxError> {
    info!(service = name, addr = %listener.addr(), "accepting connections");
    loop {
        tokio::select! {
            _ = stop.cancelled() => {
                listener.close();
                return Ok(());
            }
            result = listener.accept() => {
                let conn = result?;
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
                                warn!(%err, peer = %conn.peer_addr, "connection read error");
                                break;
                            }
                        }
                    }
                });
            }
        }
    }
}

async fn shutdown(name: &'static str, stop: CancellationToken) -> Result<(), grace::BoxError> {
    info!(service = name, "shutting down");
    stop.cancel();
    Ok(())
}
