//! Game-room synchronization for Barricade.
//!
//! Two pieces live here:
//!
//! - [`RoomRegistry`] — which live connections are watching which game.
//!   The registry holds *non-owning* references; the transport layer
//!   owns every sink and unsubscribes it on disconnect.
//! - [`BroadcastCoordinator`] — after any game mutation, pushes the
//!   freshly rendered view to every subscriber of that game,
//!   opportunistically pruning connections whose sends fail.
//!
//! Delivery is best-effort by contract: no acknowledgement, no retry,
//! no ordering across connections, and a client that subscribes after a
//! broadcast fired fetches its baseline view through request/response
//! instead.

mod broadcast;
mod registry;

pub use broadcast::BroadcastCoordinator;
pub use registry::RoomRegistry;
