use axum::{
    Router,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{bookings, credit, customers, money_transactions, overview};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Build the HTTP router around `engine`.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route(
            "/air-bookings",
            get(bookings::list).post(bookings::create),
        )
        .route("/air-bookings/summary", get(bookings::summary))
        .route(
            "/air-bookings/{id}",
            get(bookings::get)
                .put(bookings::update)
                .delete(bookings::delete),
        )
        .route("/credit-settings", get(credit::get).put(credit::update))
        .route(
            "/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/customers/{id}/recompute", post(customers::recompute))
        .route(
            "/money-transactions",
            get(money_transactions::list).post(money_transactions::create),
        )
        .route(
            "/money-transactions/{id}",
            put(money_transactions::update).delete(money_transactions::delete),
        )
        .route("/overview", get(overview::get))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
