use actix_web::{HttpResponse, get, web};

use super::envelope::ok_json;
use super::models::AppState;
use crate::article::{ArticleQuery, TermQuery};
use crate::error::DemoResult;

#[get("/article/page")]
pub async fn article_page(
    state: web::Data<AppState>,
    query: web::Query<ArticleQuery>,
) -> HttpResponse {
    let store = state.articles.lock().expect("mutex poisoned");
    ok_json(store.page(&query))
}

/// Fetch one article; each read bumps its view count.
#[get("/article/{id}")]
pub async fn article_by_id(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> DemoResult<HttpResponse> {
    let mut store = state.articles.lock().expect("mutex poisoned");
    Ok(ok_json(store.get_by_id(path.into_inner())?))
}

#[get("/article/slug/{slug}")]
pub async fn article_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> DemoResult<HttpResponse> {
    let mut store = state.articles.lock().expect("mutex poisoned");
    Ok(ok_json(store.get_by_slug(&path)?))
}

#[get("/term/page")]
pub async fn term_page(
    state: web::Data<AppState>,
    query: web::Query<TermQuery>,
) -> HttpResponse {
    let store = state.articles.lock().expect("mutex poisoned");
    ok_json(store.term_page(&query))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use crate::api::{AppState, init_routes};

    #[actix_web::test]
    async fn page_and_filter() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/article/page?page=1&pageSize=6")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"]["hasMore"], false);

        let req = test::TestRequest::get()
            .uri("/api/article/page?category=defi")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["items"][0]["id"], 4);
    }

    #[actix_web::test]
    async fn read_counts_views_and_unknown_is_404() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        for expected in 1..=2 {
            let req = test::TestRequest::get().uri("/api/article/2").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"]["viewCount"], expected);
        }

        let req = test::TestRequest::get()
            .uri("/api/article/slug/no-such-article")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 40400);
    }

    #[actix_web::test]
    async fn terms_page() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/term/page?pageSize=4&page=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total"], 6);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    }
}
