use axum::Router;
use chrono::Utc;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use marquee_server::config::Config;
use marquee_server::engine::BookingEngine;
use marquee_server::models::Catalog;
use marquee_server::routes::{create_routes, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let catalog = Catalog::seed(Utc::now());
    tracing::info!(
        theaters = catalog.theaters.len(),
        screen_tiers = catalog.screen_tiers.len(),
        food_items = catalog.food_items.len(),
        "Catalog loaded"
    );

    let state = AppState::new(BookingEngine::new(catalog));
    let app: Router = create_routes(state);

    let config = Config::from_env();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
