//! Employee onboarding dashboard — the presentation component.
//!
//! A thin layer over the injected backend: the feed drives derived display
//! state, and each user action runs call → refresh → notify in order. The
//! WS/REST surface in [`ws`] is how UI clients reach it.

pub mod controller;
pub mod state;
pub mod ws;

pub use controller::{Dashboard, ROW_ACTION_MARK_COMPLETED};
pub use state::{ActionKind, ActionState, DashboardState};
pub use ws::{dashboard_routes, ClientAction, ServerEvent};
