use std::net::{IpAddr, Ipv6Addr};

use anyhow::Context;
use book_catalog::limits::ConnectionLimiter;
use book_catalog::logging::{self, LogFormat};
use book_catalog::*;
use clap::Parser;
use futures::future;
use futures_util::StreamExt;
use tarpc::server::{self, incoming::Incoming, Channel};
use tarpc::tokio_serde::formats::Json;
use tracing::{info, warn};

/// Serve the book catalog over tarpc.
#[derive(Debug, Parser)]
#[command(name = "book-server", version)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V6(Ipv6Addr::LOCALHOST))]
    host: IpAddr,

    /// The server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum concurrently served connections
    #[arg(long, default_value_t = 10)]
    max_connections: usize,

    /// Maximum concurrent channels from a single peer IP
    #[arg(long, default_value_t = 1)]
    max_channels_per_ip: u32,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.log_format, "info");

    let server = CatalogServer::seeded();
    let limiter = ConnectionLimiter::new(args.max_connections);

    let server_addr = (args.host, args.port);
    let mut listener = tarpc::serde_transport::tcp::listen(&server_addr, Json::default)
        .await
        .with_context(|| format!("failed to listen on {}:{}", args.host, args.port))?;
    listener.config_mut().max_frame_length(usize::MAX);

    info!(
        addr = %listener.local_addr(),
        max_connections = limiter.max(),
        max_channels_per_ip = args.max_channels_per_ip,
        "server listening"
    );

    let serve = listener
        // Ignore accept errors.
        .filter_map(|r| future::ready(r.ok()))
        .map(server::BaseChannel::with_defaults)
        .max_channels_per_key(args.max_channels_per_ip, |t| {
            t.transport()
                .peer_addr()
                .map(|addr| addr.ip())
                .unwrap_or(IpAddr::V6(Ipv6Addr::UNSPECIFIED))
        })
        .for_each(|channel| {
            let server = server.clone();
            let limiter = limiter.clone();
            async move {
                let peer = channel.transport().peer_addr().ok();
                let Some(permit) = limiter.try_acquire() else {
                    warn!(
                        ?peer,
                        active = limiter.active(),
                        max = limiter.max(),
                        "connection limit reached, rejecting"
                    );
                    return;
                };
                info!(?peer, active = permit.active(), max = limiter.max(), "connection opened");

                let fut = channel.execute(server.serve());
                tokio::spawn(async move {
                    fut.await;
                    drop(permit);
                    info!(?peer, active = limiter.active(), "connection closed");
                });
            }
        });

    tokio::select! {
        _ = serve => {}
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for ctrl-c")?;
            warn!("interrupted, stopping server");
        }
    }

    info!("server stopped");
    Ok(())
}
