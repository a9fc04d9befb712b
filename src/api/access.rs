use actix_web::{HttpResponse, get, post, web};

use super::envelope::ok_json;
use super::models::{AccessRequest, AccessResponse, AppState, LimitRequest, PlanView};
use crate::access::PlanTier;
use crate::access::gate::within_limit;

#[get("/access/plans")]
pub async fn plans() -> HttpResponse {
    let views: Vec<PlanView> = PlanTier::ALL
        .into_iter()
        .map(|tier| PlanView {
            tier,
            permissions: tier.permissions().to_vec(),
            limits: tier.limits(),
        })
        .collect();
    ok_json(views)
}

/// Gate decision plus what to render: the permission itself when allowed,
/// the fallback text otherwise.
#[post("/access/check")]
pub async fn check_access(
    state: web::Data<AppState>,
    req: web::Json<AccessRequest>,
) -> HttpResponse {
    let req = req.into_inner();
    let (decision, render) = state.gate.render(
        req.permission,
        req.plan,
        || req.permission,
        req.fallback,
    );
    ok_json(AccessResponse { decision, render })
}

/// Gate checks seen since startup.
#[get("/access/usage")]
pub async fn usage_summary(state: web::Data<AppState>) -> HttpResponse {
    ok_json(state.usage.summary())
}

#[post("/access/limit")]
pub async fn check_limit(req: web::Json<LimitRequest>) -> HttpResponse {
    ok_json(within_limit(req.plan, req.kind, req.used))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::api::{AppState, init_routes};

    #[actix_web::test]
    async fn free_plan_sees_fallback_for_pos() {
        let state = web::Data::new(AppState::default());
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/access/check")
            .set_json(json!({"permission": "pos_access", "plan": "free"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["decision"]["allowed"], false);
        assert_eq!(body["data"]["decision"]["required_tier"], "monthly");
        assert_eq!(body["data"]["render"]["kind"], "fallback");

        let req = test::TestRequest::get().uri("/api/access/usage").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["denied"], 1);
        assert_eq!(body["data"]["recent"][0]["permission"], "pos_access");
    }

    #[actix_web::test]
    async fn paid_plan_renders_content() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/access/check")
            .set_json(json!({"permission": "pos_access", "plan": "yearly", "fallback": "nope"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["render"]["kind"], "content");
        assert_eq!(body["data"]["render"]["value"], "pos_access");

        let req = test::TestRequest::get().uri("/api/access/plans").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
    }
}
