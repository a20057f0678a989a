use axum::handler::Handler;
use axum::routing::get;
use axum::Router;
use pyper_core::PyperApp;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::rest;
use crate::{PyperAxumState, SessionRegistry};

#[derive(Clone)]
pub struct AxumApp {
    pub app: PyperApp,
    pub sessions: SessionRegistry,
    pub router: Router<()>,
}

impl AxumApp {
    /// Router with every dashboard route mounted on a fresh session registry.
    pub fn new(app: PyperApp) -> Self {
        let state = PyperAxumState::new(app.clone());
        Self {
            app,
            sessions: state.sessions.clone(),
            router: rest::dashboard_router(state),
        }
    }

    pub fn use_get<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + Sync + 'static,
        T: 'static,
    {
        self.router = self.router.route(path, get(handler));
        self
    }

    /// Request ids and per-request trace spans. Routes added after this
    /// call are not covered.
    pub fn with_http_layers(mut self) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );
        self
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, app = %self.app.info().name, "listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

pub fn axum(app: PyperApp) -> AxumApp {
    AxumApp::new(app)
}
