// src/server.rs

// dependencies
use crate::config::ServerConfig;
use anyhow::Context;
use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use http::{HeaderValue, Method, StatusCode};
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// The development HTTP server: static mounts plus the configured CORS policy.
#[derive(Debug)]
pub struct DevServer {
    config: ServerConfig,
}

// how OPTIONS requests are finished
#[derive(Clone)]
struct Preflight {
    status: StatusCode,
    // present when preflights are passed on to the static routes
    passthrough: Option<Router>,
    allow_origin: Option<HeaderValue>,
}

// methods for the DevServer type
impl DevServer {
    pub fn new(config: ServerConfig) -> Self {
        DevServer { config }
    }

    // the static routes alone: one ServeDir per alias, the public dir as fallback
    fn routes(&self) -> Router {
        let mut routes = Router::new();

        for mount in self.config.mounts() {
            let serve_dir = ServeDir::new(&mount.root_dir)
                .append_index_html_on_directories(mount.serve_index);

            if mount.mount_path == "/" {
                routes = routes.fallback_service(serve_dir);
            } else if mount.mount_path.contains(['{', '}', '*']) {
                warn!(mount = %mount.mount_path, "alias name is not a valid route; skipping");
            } else {
                debug!(mount = %mount.mount_path, root = %mount.root_dir.display(), "mounting alias");
                routes = routes.nest_service(&mount.mount_path, serve_dir);
            }
        }

        routes
    }

    /// The full application: static routes behind the CORS policy.
    pub fn router(&self) -> Router {
        let cors = &self.config.server.cors;
        let routes = self.routes();

        let preflight = Preflight {
            status: cors.preflight_status(),
            passthrough: cors.preflight_continue.then(|| routes.clone()),
            allow_origin: (cors.origin == crate::cors::ANY_ORIGIN)
                .then(|| HeaderValue::from_static(crate::cors::ANY_ORIGIN)),
        };

        routes
            .layer(cors.layer())
            .layer(middleware::from_fn_with_state(preflight, finish_options))
            .layer(TraceLayer::new_for_http())
    }

    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind dev server on {addr}"))?;

        info!(
            "dev server listening on {} (mode={}, public dir={})",
            listener.local_addr()?,
            self.config.mode,
            self.config.public_dir.display()
        );
        Ok(listener)
    }

    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    // serve on `listener` until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("dev server failed")?;

        info!("dev server stopped accepting connections");
        Ok(())
    }
}

// the CORS layer answers every OPTIONS itself with 200; report the configured
// status instead, or hand the request on when preflights continue
async fn finish_options(
    State(preflight): State<Preflight>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    match preflight.passthrough {
        Some(routes) => {
            let mut response = match routes.oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            };
            if let Some(origin) = preflight.allow_origin {
                response
                    .headers_mut()
                    .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }
            response
        }
        None => {
            let mut response = next.run(request).await;
            *response.status_mut() = preflight.status;
            response
        }
    }
}
