//! Runs a Barricade server with one demo game, so a WebSocket client
//! (or just `websocat`) can subscribe and watch broadcasts live.
//!
//! ```text
//! cargo run -p barricade-server-demo -- 127.0.0.1:8080
//! ```

use std::time::Duration;

use barricade::prelude::*;

#[tokio::main]
async fn main() -> Result<(), BarricadeError> {
    init_tracing();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let server = BarricadeServer::builder().bind(&addr).build().await?;
    let hub = server.hub();

    let view = hub
        .create(
            UserId(1),
            &PlayerProfile {
                name: "demo".to_string(),
                color: "#e63946".to_string(),
            },
        )
        .await?;
    tracing::info!(
        game = %view.id,
        code = view.join_code.as_str(),
        "demo game ready; subscribe by sending the game id as text"
    );

    // A vote every few seconds keeps subscribers seeing fresh views.
    let game = view.id;
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            if let Err(e) = hub.add_vote(game).await {
                tracing::warn!(error = %e, "demo vote failed");
                break;
            }
        }
    });

    server.run().await
}
