use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::http::connection::Connection;
use crate::server::SiteContext;

pub async fn run(listen_addr: &str, ctx: Arc<SiteContext>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listen_addr);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            Connection::new(socket, peer.to_string(), ctx).run().await;
        });
    }
}
