//! Live layout: a tick-driven controller and the HTTP server around it.

mod controller;
mod routes;

pub use controller::{DragOverride, InteractiveController, RunState};
pub use routes::{AppState, ControlAction, ControlRequest, DragRequest, Session, StatusResponse, router, serve};
