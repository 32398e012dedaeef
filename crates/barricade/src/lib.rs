//! # Barricade
//!
//! Backend for a social-deduction party game: an in-memory game store,
//! a WebSocket push layer that keeps every connected client holding the
//! same full game view, and a brute-force optimizer that hands out the
//! eight roles according to player preference rankings.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use barricade::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BarricadeError> {
//!     init_tracing();
//!     let server = BarricadeServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .build()
//!         .await?;
//!     // Keep the hub handle to drive mutations (votes, tokens, roles).
//!     let _hub = server.hub();
//!     server.run().await
//! }
//! ```

mod error;
mod hub;
mod server;

pub use error::BarricadeError;
pub use hub::GameHub;
pub use server::{BarricadeServer, BarricadeServerBuilder};

/// Everything an embedding application usually needs.
pub mod prelude {
    pub use crate::{
        init_tracing, BarricadeError, BarricadeServer, BarricadeServerBuilder,
        GameHub,
    };
    pub use barricade_game::{GameError, GameStore, PlayerProfile};
    pub use barricade_protocol::{
        FlagColor, GameId, GamePhase, GameView, PlayerId, Role, TokenKind,
        UserId,
    };
}

/// Installs a `tracing` subscriber honouring `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
