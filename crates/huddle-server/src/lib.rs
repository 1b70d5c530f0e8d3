//! HTTP surface for the Huddle workspace assistant.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use routes::router;
pub use state::AppState;

use log::info;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind `address` and serve until `shutdown` resolves.
pub async fn serve<F>(state: Arc<AppState>, address: &str, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(address).await?;
    info!("huddle server listening (address={})", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("huddle server stopped");
    Ok(())
}
