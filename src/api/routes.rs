use actix_web::{get, post, web, HttpResponse, Result as WebResult};

use crate::api::models::{ErrorResponse, GenerateRequest, StartSessionResponse};
use crate::error::CoreError;
use crate::session::{SessionId, SessionService};

fn error_response(err: &CoreError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        CoreError::SessionNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[post("/start-session")]
pub async fn start_session(service: web::Data<SessionService>) -> WebResult<HttpResponse> {
    match service.start_session().await {
        Ok(session_id) => Ok(HttpResponse::Ok().json(StartSessionResponse { session_id })),
        Err(e) => Ok(error_response(&e)),
    }
}

#[post("/generate")]
pub async fn generate(
    service: web::Data<SessionService>,
    req: web::Json<GenerateRequest>,
) -> WebResult<HttpResponse> {
    let req = req.into_inner();

    match service.generate(&req.session_id, &req.input).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(error_response(&e)),
    }
}

// --- Read-only session views ---

#[get("/{id}/history")]
pub async fn get_history(
    service: web::Data<SessionService>,
    id: web::Path<String>,
) -> WebResult<HttpResponse> {
    let id = SessionId::from(id.into_inner());

    match service.store().get_history(&id).await {
        Ok(turns) => Ok(HttpResponse::Ok().json(turns)),
        Err(e) => Ok(error_response(&e)),
    }
}

#[get("/{id}/export")]
pub async fn export_session(
    service: web::Data<SessionService>,
    id: web::Path<String>,
) -> WebResult<HttpResponse> {
    let id = SessionId::from(id.into_inner());

    let session = match service.store().get_session(&id).await {
        Ok(s) => s,
        Err(e) => return Ok(error_response(&e)),
    };

    let mut export = String::new();
    export.push_str(&format!("Session: {}\n", session.id));
    export.push_str(&format!("Created At: {}\n", session.created_at));
    export.push_str("---\n");

    for turn in session.turns() {
        export.push_str(&format!(
            "[{}]: {}\n",
            turn.role.as_str().to_uppercase(),
            turn.content
        ));
        export.push_str("---\n");
    }

    Ok(HttpResponse::Ok()
        .content_type("text/plain")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"session_{}.txt\"", id),
        ))
        .body(export))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(start_session).service(generate).service(
        web::scope("/sessions")
            .service(get_history)
            .service(export_session),
    );
}
