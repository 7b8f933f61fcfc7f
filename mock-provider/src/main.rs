use mock_gemini::{make_router, MockReply};
use std::net::SocketAddr;

/// Defaults to 127.0.0.1:3030 when no address is given on the command line.
fn get_listener_address() -> SocketAddr {
    match std::env::args().nth(1) {
        Some(addr) => addr
            .parse()
            .unwrap_or_else(|e| panic!("Invalid address: {addr}: {e}")),
        None => SocketAddr::from(([127, 0, 0, 1], 3030)),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let listener_address = get_listener_address();
    let listener = tokio::net::TcpListener::bind(listener_address)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {listener_address}: {e}"));

    let reply = MockReply::text("[PDF Page 1 | Doc Page 1] [KEYWORD: example] This is an example sentence.");
    let (router, _requests) = make_router(reply);

    log::info!("Mock Gemini listening on http://{}/v1beta", listener_address);
    axum::serve(listener, router).await.unwrap();
}
