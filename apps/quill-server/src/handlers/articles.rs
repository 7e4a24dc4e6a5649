//! Admin article handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Article, ArticleForm, ArticleStatus};
use quill_shared::dto::{ArticleRequest, ArticleResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

fn to_form(request: ArticleRequest) -> AppResult<ArticleForm> {
    let status = request
        .status
        .parse::<ArticleStatus>()
        .map_err(|e| AppError::Validation {
            field: "status".to_string(),
            message: e.to_string(),
        })?;

    Ok(ArticleForm {
        title: request.title,
        slug: request.slug,
        content: request.content,
        introduction: request.introduction,
        post: request.post,
        status,
        publication_timestamp: request.publication_timestamp,
    })
}

fn to_response(article: &Article) -> ArticleResponse {
    ArticleResponse {
        id: article.id().unwrap_or_default(),
        title: article.title.clone(),
        slug: article.slug.clone(),
        content: article.content.clone(),
        introduction: article.introduction.clone(),
        post: article.post,
        status: article.status().to_string(),
        publication_timestamp: article.publication_timestamp().map(|ts| ts.to_rfc3339()),
        version: article.version(),
        created_at: article.created_at.to_rfc3339(),
        updated_at: article.updated_at.to_rfc3339(),
    }
}

/// POST /api/admin/articles
pub async fn create(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<ArticleRequest>,
) -> AppResult<HttpResponse> {
    let form = to_form(body.into_inner())?;
    tracing::debug!(request_id = %request_id.as_str(), title = %form.title, "Creating article");

    let saved = state.articles.create(&form).await?;

    Ok(HttpResponse::Created().json(to_response(&saved)))
}

/// GET /api/admin/articles/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let article = state.articles.find(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(&article)))
}

/// PUT /api/admin/articles/{id}
pub async fn update(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<i64>,
    body: web::Json<ArticleRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = to_form(body.into_inner())?;
    tracing::debug!(request_id = %request_id.as_str(), article_id = id, "Updating article");

    let saved = state.articles.update(id, &form).await?;

    Ok(HttpResponse::Ok().json(to_response(&saved)))
}

/// DELETE /api/admin/articles/{id}
pub async fn delete(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    tracing::debug!(request_id = %request_id.as_str(), article_id = id, "Deleting article");

    state.articles.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::{Value, json};

    use quill_core::ports::TaskScheduler;
    use quill_core::test_utils::{ManualClock, RecordingTaskScheduler};
    use quill_infra::InMemoryArticleRepository;

    use super::*;
    use crate::handlers::configure_routes;
    use crate::observability::RequestIdMiddleware;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn state(timers: Arc<RecordingTaskScheduler>) -> AppState {
        AppState::new(
            Arc::new(InMemoryArticleRepository::new()),
            timers as Arc<dyn TaskScheduler>,
            Arc::new(ManualClock::new(now())),
        )
    }

    fn body(status: &str, publication_timestamp: Option<DateTime<Utc>>) -> Value {
        json!({
            "title": "Spring release",
            "slug": "spring-release",
            "content": "Everything new this spring",
            "post": true,
            "status": status,
            "publication_timestamp": publication_timestamp,
        })
    }

    #[actix_web::test]
    async fn test_create_scheduled_article() {
        let timers = Arc::new(RecordingTaskScheduler::new());
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(state(timers.clone())))
                .configure(configure_routes),
        )
        .await;

        let at = now() + Duration::hours(3);
        let req = test::TestRequest::post()
            .uri("/api/admin/articles")
            .set_json(body("SCHEDULED_FOR_PUBLICATION", Some(at)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert!(resp.headers().contains_key("x-request-id"));
        let created: ArticleResponse = test::read_body_json(resp).await;
        assert_eq!(created.status, "SCHEDULED_FOR_PUBLICATION");
        assert_eq!(created.publication_timestamp, Some(at.to_rfc3339()));
        assert_eq!(timers.pending().len(), 1);
    }

    #[actix_web::test]
    async fn test_past_schedule_is_unprocessable() {
        let timers = Arc::new(RecordingTaskScheduler::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(timers.clone())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/articles")
            .set_json(body("SCHEDULED_FOR_PUBLICATION", Some(now() - Duration::hours(1))))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["field"], "publication_timestamp");
        assert_eq!(problem["status"], 422);
        assert!(timers.armed().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_status_is_unprocessable() {
        let timers = Arc::new(RecordingTaskScheduler::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(timers)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/articles")
            .set_json(body("ARCHIVED", None))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["field"], "status");
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let timers = Arc::new(RecordingTaskScheduler::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(timers)))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/articles")
            .set_json(json!({ "title": "No body" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 400);
    }

    #[actix_web::test]
    async fn test_update_then_delete() {
        let timers = Arc::new(RecordingTaskScheduler::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(timers.clone())))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/articles")
            .set_json(body("DRAFT", None))
            .to_request();
        let created: ArticleResponse = test::call_and_read_body_json(&app, req).await;

        let at = now() + Duration::minutes(45);
        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/articles/{}", created.id))
            .set_json(body("SCHEDULED_FOR_PUBLICATION", Some(at)))
            .to_request();
        let updated: ArticleResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.version, 1);
        assert_eq!(timers.pending().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/articles/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(timers.pending().is_empty());

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/articles/{}", created.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
