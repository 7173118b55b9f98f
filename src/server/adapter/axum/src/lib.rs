/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;

use marquee_server::MarqueeServer;

pub use handler::RequestContext;
/// Re-export marquee-server core for convenience
pub use marquee_server;

/// Extension trait that converts a `MarqueeServer` into an Axum router.
pub trait IntoAxumRouter {
  /// Marquee endpoints only (`/_marquee/*`), guarded.
  fn into_axum_router(self) -> axum::Router;

  /// Site routes merged with the Marquee endpoints; every GET page request
  /// passes the visibility guard before reaching `site`.
  fn wrap_site(self, site: axum::Router) -> axum::Router;

  fn serve(
    self,
    addr: &str,
    site: axum::Router,
  ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send;
}

impl IntoAxumRouter for MarqueeServer {
  fn into_axum_router(self) -> axum::Router {
    handler::build_router(self.into_parts(), axum::Router::new())
  }

  fn wrap_site(self, site: axum::Router) -> axum::Router {
    handler::build_router(self.into_parts(), site)
  }

  async fn serve(self, addr: &str, site: axum::Router) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.wrap_site(site);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Marquee site running on http://localhost:{}", local_addr.port());
    axum::serve(listener, router).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests;
