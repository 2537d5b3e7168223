use super::controller::{InteractiveController, RunState};
use crate::config::ServeSettings;
use crate::model::Vec2;
use crate::render::{Frame, LiveScene};
use crate::style;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Controller plus the live scene it projects into.
pub struct Session {
    controller: InteractiveController,
    scene: LiveScene,
}

impl Session {
    pub fn new(controller: InteractiveController) -> std::io::Result<Self> {
        let mut scene = LiveScene::default();
        controller.project(&mut scene)?;
        Ok(Self { controller, scene })
    }

    pub fn tick(&mut self) -> std::io::Result<usize> {
        self.controller.tick(&mut self.scene)
    }

    pub fn frame(&self) -> &Frame {
        self.scene.frame()
    }

    pub fn controller(&self) -> &InteractiveController {
        &self.controller
    }
}

/// Application state shared across handlers and the ticker
pub struct AppState {
    session: Mutex<Session>,
}

impl AppState {
    fn session(&self) -> MutexGuard<'_, Session> {
        // a panicked tick leaves the layout usable
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Pause,
    Resume,
    Step,
}

#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    pub action: ControlAction,
}

/// Pointer position in screen pixels of the rendered SVG.
#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub node: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: RunState,
    pub dragging: Option<usize>,
}

pub fn router(session: Session) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        session: Mutex::new(session),
    });

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/snapshot", get(snapshot_handler))
        .route("/api/frame", get(frame_handler))
        .route("/api/control", post(control_handler))
        .route("/api/drag", post(drag_handler).delete(release_handler))
        .layer(cors)
        .with_state(state.clone());

    (app, state)
}

/// Start the live layout server and its simulation ticker
pub async fn serve(
    session: Session,
    settings: &ServeSettings,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (app, state) = router(session);

    let tick = Duration::from_millis(settings.tick_ms.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let ticked = state.session().tick();
            if let Err(e) = ticked {
                style::warning(&format!("Live frame failed: {}", e));
            }
        }
    });

    let addr = format!("127.0.0.1:{}", settings.port);
    let url = format!("http://{}", addr);

    style::status(&format!("Serving live layout at {}", style::url(&url)));
    style::hint("space pauses or resumes, s steps once, drag modules to pin them");
    style::hint("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut body = Vec::new();
    let written = state.session().controller().write_document(&mut body);
    match written {
        Ok(()) => ([(header::CONTENT_TYPE, "image/svg+xml")], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn snapshot_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session().controller().snapshot())
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.session().frame().clone())
}

async fn control_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ControlRequest>,
) -> impl IntoResponse {
    let mut session = state.session();
    let controller = &mut session.controller;
    match request.action {
        ControlAction::Pause => controller.pause(),
        ControlAction::Resume => controller.resume(),
        ControlAction::Step => controller.step_once(),
    }
    Json(status(controller))
}

async fn drag_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DragRequest>,
) -> Response {
    let mut session = state.session();
    let controller = &mut session.controller;
    match controller.drag_to(request.node, Vec2::new(request.x, request.y)) {
        Ok(()) => Json(status(controller)).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

async fn release_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session();
    session.controller.end_drag();
    Json(status(&session.controller))
}

fn status(controller: &InteractiveController) -> StatusResponse {
    StatusResponse {
        state: controller.state(),
        dragging: controller.drag().map(|d| d.node),
    }
}
