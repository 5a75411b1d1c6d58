use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::data::{Limits, ToByteUnit};
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{catch, catchers, delete, get, patch, post, put, routes, Build, Rocket, State};
use serde::Serialize;

use common::ServerConfig;

use crate::gateway::transport::{self, Reply};
use crate::gateway::Gateway;

/// Application state stored inside Rocket managed state.
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            started_at: Utc::now(),
            gateway,
        }
    }
}

impl<'r> Responder<'r, 'static> for Reply {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = Status::from_code(self.status).unwrap_or(Status::InternalServerError);
        (status, Json(self.body)).respond_to(req)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    uptime_seconds: i64,
}

#[get("/health")]
async fn health(state: &State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "text-summarizer",
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// The summarization endpoint. Raw body goes straight to the transport adapter
/// so decoding errors come back in the gateway's own `{error}` shape.
#[post("/summarize", data = "<body>")]
async fn summarize(state: &State<AppState>, body: String) -> Reply {
    transport::handle(&state.gateway, "POST", &body).await
}

#[get("/summarize")]
async fn summarize_get(state: &State<AppState>) -> Reply {
    transport::handle(&state.gateway, "GET", "").await
}

#[put("/summarize")]
async fn summarize_put(state: &State<AppState>) -> Reply {
    transport::handle(&state.gateway, "PUT", "").await
}

#[patch("/summarize")]
async fn summarize_patch(state: &State<AppState>) -> Reply {
    transport::handle(&state.gateway, "PATCH", "").await
}

#[delete("/summarize")]
async fn summarize_delete(state: &State<AppState>) -> Reply {
    transport::handle(&state.gateway, "DELETE", "").await
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<serde_json::Value>) {
    let message = match status.code {
        404 => "Not found".to_string(),
        413 => "Request body too large".to_string(),
        code if code >= 500 => "Internal server error".to_string(),
        _ => status.reason_lossy().to_string(),
    };
    (status, Json(serde_json::json!({ "error": message })))
}

/// Rocket figment for the `[server]` section. Pasted articles can be large, so the
/// string body limit is raised well above Rocket's default.
pub fn figment(server: &ServerConfig) -> Figment {
    rocket::Config::figment()
        .merge(("address", server.bind.clone()))
        .merge(("port", server.port))
        .merge(("limits", Limits::default().limit("string", 2.mebibytes())))
}

pub fn build_rocket(state: AppState, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .mount(
            "/api",
            routes![
                health,
                summarize,
                summarize_get,
                summarize_put,
                summarize_patch,
                summarize_delete,
            ],
        )
        .register("/", catchers![default_catcher])
}

/// Launch the HTTP gateway and block until Rocket shuts down.
pub async fn launch_rocket(gateway: Arc<Gateway>, server: &ServerConfig) -> Result<()> {
    let rocket = build_rocket(AppState::new(gateway), figment(server));

    tracing::info!("Starting Rocket HTTP server on {}:{}", server.bind, server.port);
    rocket
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
