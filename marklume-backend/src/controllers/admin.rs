//! Admin login/logout via the shared-secret cookie.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use crate::admin::AdminKey;
use crate::AppState;

/// Reject the request unless it carries the admin key
pub(crate) fn validate_admin_from_request(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<(), HttpResponse> {
    if state.admin_key.is_admin_request(req) {
        Ok(())
    } else {
        log::warn!("[ADMIN] Rejected admin request to {}", req.path());
        Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Invalid admin key"
        })))
    }
}

fn redirect(location: &str) -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location));
    builder
}

/// Login status for the admin key page
async fn admin_key_status(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "is_admin": data.admin_key.is_admin_request(&req)
    }))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    key: String,
}

async fn login(data: web::Data<AppState>, form: web::Form<LoginForm>) -> impl Responder {
    if data.admin_key.matches(&form.key) {
        log::info!("[ADMIN] Admin logged in");
        redirect("/").cookie(data.admin_key.login_cookie()).finish()
    } else {
        log::warn!("[ADMIN] Login attempt with an invalid key");
        redirect("/admin/key").finish()
    }
}

async fn logout() -> impl Responder {
    redirect("/").cookie(AdminKey::logout_cookie()).finish()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/key", web::get().to(admin_key_status))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout)),
    );
}
