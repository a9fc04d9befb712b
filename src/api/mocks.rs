use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use uuid::Uuid;

use super::envelope::{ApiResponse, ok_json};
use super::models::{AppState, StatusRequest};
use crate::error::DemoResult;
use crate::mock::{MockInput, MockPatch};

#[get("/mocks")]
pub async fn list_mocks(state: web::Data<AppState>) -> HttpResponse {
    let mocks = state.mocks.lock().expect("mutex poisoned");
    ok_json(mocks.list())
}

#[post("/mocks")]
pub async fn create_mock(
    state: web::Data<AppState>,
    body: web::Json<MockInput>,
) -> DemoResult<HttpResponse> {
    let mut mocks = state.mocks.lock().expect("mutex poisoned");
    let created = mocks.create(body.into_inner())?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(created, "mock created")))
}

#[get("/mocks/{id}")]
pub async fn get_mock(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> DemoResult<HttpResponse> {
    let mocks = state.mocks.lock().expect("mutex poisoned");
    Ok(ok_json(mocks.get(path.into_inner())?))
}

#[put("/mocks/{id}")]
pub async fn replace_mock(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<MockInput>,
) -> DemoResult<HttpResponse> {
    let mut mocks = state.mocks.lock().expect("mutex poisoned");
    Ok(ok_json(mocks.replace(path.into_inner(), body.into_inner())?))
}

#[patch("/mocks/{id}")]
pub async fn patch_mock(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<MockPatch>,
) -> DemoResult<HttpResponse> {
    let mut mocks = state.mocks.lock().expect("mutex poisoned");
    Ok(ok_json(mocks.patch(path.into_inner(), body.into_inner())?))
}

#[patch("/mocks/{id}/status")]
pub async fn set_mock_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<StatusRequest>,
) -> DemoResult<HttpResponse> {
    let mut mocks = state.mocks.lock().expect("mutex poisoned");
    Ok(ok_json(mocks.set_status(path.into_inner(), body.enabled)?))
}

#[delete("/mocks/{id}")]
pub async fn delete_mock(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> DemoResult<HttpResponse> {
    let mut mocks = state.mocks.lock().expect("mutex poisoned");
    let removed = mocks.delete(path.into_inner())?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(removed.id, "mock deleted")))
}
