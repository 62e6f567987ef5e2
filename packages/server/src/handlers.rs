//! HTTP handler functions for the dashboard API.

use std::str::FromStr as _;

use actix_web::{HttpResponse, web};
use dashbike_accident_models::Column;
use dashbike_dashboard::{
    CALLBACKS, Dashboard, DashboardError, UpdateRequest,
    callbacks::{MapInputs, map_of_rows, map_rows},
    page_content,
    pages::app_shell,
};
use dashbike_server_models::{
    ApiColumnValues, ApiError, ApiHealth, ApiSession, PageQueryParams, SessionMapParams,
};
use uuid::Uuid;

use crate::{AppState, summarize};

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.ctx.table.len(),
        loaded_at: state.loaded_at,
    })
}

/// `GET /api/dataset`
pub async fn dataset(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(summarize(&state.ctx))
}

/// `GET /api/callbacks`
///
/// Lists every reactive output with the controls it reads.
pub async fn callbacks() -> HttpResponse {
    HttpResponse::Ok().json(CALLBACKS)
}

/// `POST /api/update`
///
/// Recomputes one output from the posted control values.
pub async fn update(state: web::Data<AppState>, body: web::Json<serde_json::Value>) -> HttpResponse {
    let request: UpdateRequest = match serde_json::from_value(body.into_inner()) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected update request: {e}");
            return HttpResponse::BadRequest().json(ApiError::new(format!(
                "Invalid update request: {e}"
            )));
        }
    };
    let output = request.output();

    match dashbike_dashboard::update(Dashboard::new(&state.ctx, &state.boundaries), request) {
        Ok(update) => HttpResponse::Ok().json(update),
        Err(e) => dashboard_error(&format!("Failed to update {output}"), &e),
    }
}

/// `GET /api/pages?path=...`
///
/// Routes a URL path to its page layout. Unknown paths answer 404 with the
/// not-found fragment as body.
pub async fn page(state: web::Data<AppState>, params: web::Query<PageQueryParams>) -> HttpResponse {
    let path = params.path.as_deref().unwrap_or("/");
    let content = page_content(&state.ctx, path);

    if content.found {
        HttpResponse::Ok().json(content)
    } else {
        HttpResponse::NotFound().json(content)
    }
}

/// `GET /api/layout`
///
/// The navigation shell wrapping every page.
pub async fn layout() -> HttpResponse {
    HttpResponse::Ok().json(app_shell())
}

/// `GET /api/columns/{column}/values`
pub async fn column_values(state: web::Data<AppState>, column: web::Path<String>) -> HttpResponse {
    let name = column.into_inner();
    let Some(column) = Column::from_str(&name)
        .ok()
        .filter(|column| state.ctx.table.has_column(*column))
    else {
        return HttpResponse::NotFound().json(ApiError::new(format!("Unknown column '{name}'")));
    };

    HttpResponse::Ok().json(ApiColumnValues {
        column: column.to_string(),
        title: column.title().to_string(),
        values: state.ctx.table.domain(column).to_vec(),
    })
}

/// `POST /api/sessions`
///
/// Applies the accident map filters once and caches the matching rows.
pub async fn create_session(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    let inputs: MapInputs = match serde_json::from_value(body.into_inner()) {
        Ok(inputs) => inputs,
        Err(e) => {
            log::warn!("Rejected map filters: {e}");
            return HttpResponse::BadRequest()
                .json(ApiError::new(format!("Invalid map filters: {e}")));
        }
    };

    match map_rows(&state.ctx, &inputs) {
        Ok(rows) => {
            let count = rows.len();
            let (id, session) = state.sessions.insert(rows);
            log::debug!("Cached session {id} with {count} rows");
            HttpResponse::Created().json(ApiSession {
                id: id.to_string(),
                rows: count,
                created_at: session.created_at,
            })
        }
        Err(e) => dashboard_error("Failed to select map rows", &e),
    }
}

/// `GET /api/sessions/{id}/map?color=...`
pub async fn session_map(
    state: web::Data<AppState>,
    id: web::Path<String>,
    params: web::Query<SessionMapParams>,
) -> HttpResponse {
    let Some((id, session)) = lookup_session(&state, &id) else {
        return session_not_found(&id);
    };
    let color = params.color.unwrap_or_default();

    match map_of_rows(&state.ctx, &session.rows, color) {
        Ok(figure) => HttpResponse::Ok().json(figure),
        Err(e) => dashboard_error(&format!("Failed to draw map for session {id}"), &e),
    }
}

/// `DELETE /api/sessions/{id}`
pub async fn delete_session(state: web::Data<AppState>, id: web::Path<String>) -> HttpResponse {
    match Uuid::parse_str(&id) {
        Ok(uuid) if state.sessions.remove(&uuid) => HttpResponse::NoContent().finish(),
        _ => session_not_found(&id),
    }
}

fn lookup_session(
    state: &AppState,
    id: &str,
) -> Option<(Uuid, crate::sessions::Session)> {
    let id = Uuid::parse_str(id).ok()?;
    state.sessions.get(&id).map(|session| (id, session))
}

fn session_not_found(id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new(format!("Unknown session '{id}'")))
}

/// Maps a dashboard failure to 400 for bad arguments and 500 otherwise.
fn dashboard_error(context: &str, e: &DashboardError) -> HttpResponse {
    if e.is_invalid_input() {
        log::warn!("{context}: {e}");
        HttpResponse::BadRequest().json(ApiError::new(e.to_string()))
    } else {
        log::error!("{context}: {e}");
        HttpResponse::InternalServerError().json(ApiError::new(context))
    }
}
