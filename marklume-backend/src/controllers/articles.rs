//! Article REST API — public reads, admin-gated writes.
//!
//! Create and update take url-encoded `title` / `content` form bodies.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use super::admin::validate_admin_from_request;
use crate::models::{ArticleForm, ArticleResponse, ArticleSummary};
use crate::AppState;

#[derive(Debug, Serialize)]
struct ArticleListResponse {
    articles: Vec<ArticleSummary>,
    is_admin: bool,
}

#[derive(Debug, Serialize)]
struct ArticleDetailResponse {
    article: ArticleResponse,
    is_admin: bool,
}

fn not_found(id: u64) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Article {} not found", id)
    }))
}

/// List all articles (metadata only)
async fn list_articles(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(ArticleListResponse {
        articles: data.archive.list_articles(),
        is_admin: data.admin_key.is_admin_request(&req),
    })
}

/// Read one article, loading its content on demand
async fn read_article(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
) -> impl Responder {
    let article_id = path.into_inner();

    match data.archive.get_article(article_id) {
        Some(article) => HttpResponse::Ok().json(ArticleDetailResponse {
            article: article.into(),
            is_admin: data.admin_key.is_admin_request(&req),
        }),
        None => not_found(article_id),
    }
}

/// Admin-only: where the new-article form posts to
async fn new_article_form(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(resp) = validate_admin_from_request(&data, &req) {
        return resp;
    }

    HttpResponse::Ok().json(serde_json::json!({
        "action": "/articles",
        "is_admin": true
    }))
}

/// Admin-only: the article to prefill the edit form with
async fn edit_article_form(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
) -> impl Responder {
    if let Err(resp) = validate_admin_from_request(&data, &req) {
        return resp;
    }
    let article_id = path.into_inner();

    match data.archive.get_article(article_id) {
        Some(article) => HttpResponse::Ok().json(ArticleDetailResponse {
            article: article.into(),
            is_admin: true,
        }),
        None => not_found(article_id),
    }
}

async fn create_article(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ArticleForm>,
) -> impl Responder {
    if let Err(resp) = validate_admin_from_request(&data, &req) {
        return resp;
    }

    match data.archive.create_article(&form.title, &form.content) {
        Ok(article) => HttpResponse::Ok().json(ArticleDetailResponse {
            article: article.into(),
            is_admin: true,
        }),
        Err(e) => {
            log::error!("Article creation failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unable to create the article, please try again later"
            }))
        }
    }
}

async fn update_article(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
    form: web::Form<ArticleForm>,
) -> impl Responder {
    if let Err(resp) = validate_admin_from_request(&data, &req) {
        return resp;
    }
    let article_id = path.into_inner();

    match data.archive.update_article(article_id, &form.title, &form.content) {
        Ok(Some(article)) => HttpResponse::Ok().json(ArticleDetailResponse {
            article: article.into(),
            is_admin: true,
        }),
        Ok(None) => not_found(article_id),
        Err(e) => {
            log::error!("Article update failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unable to update the article, please try again later"
            }))
        }
    }
}

/// Delete an article and return the remaining list
async fn delete_article(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u64>,
) -> impl Responder {
    if let Err(resp) = validate_admin_from_request(&data, &req) {
        return resp;
    }

    data.archive.delete_article(path.into_inner());

    HttpResponse::Ok().json(ArticleListResponse {
        articles: data.archive.list_articles(),
        is_admin: true,
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(list_articles));
    cfg.service(
        web::scope("/articles")
            .route("", web::get().to(list_articles))
            .route("", web::post().to(create_article))
            .route("/new", web::get().to(new_article_form))
            .route("/{id}/edit", web::get().to(edit_article_form))
            .route("/{id}", web::get().to(read_article))
            .route("/{id}", web::put().to(update_article))
            .route("/{id}", web::delete().to(delete_article)),
    );
}
