mod analyze;
mod docs;
mod documents;
mod error;
mod follow_up_questions;
mod info;
mod middlewares;
mod router;
mod state;

use std::env;

use dotenvy::dotenv;
use router::router;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_domain = env::var("SERVER_DOMAIN").unwrap_or("localhost:3000".to_string());

    let app = router().await;

    log::info!("Listening on {}", server_domain);

    let listener = tokio::net::TcpListener::bind(&server_domain).await.unwrap();

    axum::serve(listener, app).await.unwrap();
}
