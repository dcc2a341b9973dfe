#[tokio::main]
async fn main() {
    lotdesk_observability::init();

    let config = lotdesk_api::config::Config::from_env();
    let bind_addr = config.bind_addr.clone();

    let app = lotdesk_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
