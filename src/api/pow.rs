use actix_web::{HttpResponse, get, post, put, web};
use log::{info, warn};

use super::envelope::{ApiResponse, ok_json};
use super::models::{
    AppState, ChainBlockView, ChainResponse, EditBlockRequest, HashRequest, HashResponse,
    MineRequest, MineResponse,
};
use crate::blockchain::miner::{validate_difficulty, validate_height};
use crate::blockchain::{DemoChain, MineOutcome, digest, is_valid_hash, search_cooperative};
use crate::error::DemoResult;

fn chain_view(chain: &DemoChain) -> ChainResponse {
    ChainResponse {
        difficulty: chain.difficulty,
        valid: chain.is_valid_chain(),
        blocks: chain
            .blocks
            .iter()
            .zip(chain.signed_states())
            .map(|(block, signed)| ChainBlockView {
                block: block.clone(),
                signed,
            })
            .collect(),
    }
}

/// Search for a nonce, yielding to the worker between batches.
/// `maxNonce` is capped by the server's configured bound.
#[post("/pow/mine")]
pub async fn mine(
    state: web::Data<AppState>,
    req: web::Json<MineRequest>,
) -> DemoResult<HttpResponse> {
    let difficulty = req.difficulty.unwrap_or(state.config.default_difficulty);
    let max_nonce = req
        .max_nonce
        .unwrap_or(state.config.max_nonce)
        .min(state.config.max_nonce);

    let report = search_cooperative(req.height, req.data.as_bytes(), difficulty, max_nonce).await?;
    match &report.outcome {
        MineOutcome::Found {
            nonce,
            hash: found_hash,
        } => info!(
            "POW - height={} diff={} nonce={} hash={}",
            req.height, difficulty, nonce, found_hash
        ),
        MineOutcome::NotFound => warn!(
            "POW - height={} diff={} exhausted {} nonces",
            req.height,
            difficulty,
            max_nonce.saturating_add(1)
        ),
    }

    let message = if report.outcome.is_found() {
        "nonce found"
    } else {
        "no nonce within bound"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        MineResponse {
            hash_rate_display: report.stats.format_hash_rate(),
            outcome: report.outcome,
            stats: report.stats,
            difficulty,
            max_nonce,
        },
        message,
    )))
}

/// Digest of (height, nonce, data) and whether it meets the difficulty.
#[post("/pow/hash")]
pub async fn hash_block(
    state: web::Data<AppState>,
    req: web::Json<HashRequest>,
) -> DemoResult<HttpResponse> {
    let difficulty = req.difficulty.unwrap_or(state.config.default_difficulty);
    validate_height(req.height)?;
    validate_difficulty(difficulty)?;
    let block_hash = digest(req.height, req.nonce, req.data.as_bytes());
    Ok(ok_json(HashResponse {
        valid: is_valid_hash(&block_hash, difficulty),
        hash: block_hash,
        difficulty,
    }))
}

#[get("/pow/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    let chain = state.chain.lock().expect("mutex poisoned");
    ok_json(chain_view(&chain))
}

/// Edit a block's data and/or nonce; the hash follows immediately.
#[put("/pow/chain/{index}")]
pub async fn edit_block(
    state: web::Data<AppState>,
    path: web::Path<usize>,
    req: web::Json<EditBlockRequest>,
) -> DemoResult<HttpResponse> {
    let index = path.into_inner();
    let req = req.into_inner();
    let mut chain = state.chain.lock().expect("mutex poisoned");
    if let Some(data) = req.data {
        chain.edit_data(index, data)?;
    }
    if let Some(nonce) = req.nonce {
        chain.set_nonce(index, nonce)?;
    }
    Ok(ok_json(chain_view(&chain)))
}

/// Mine one chain block without holding the chain lock during the scan.
#[post("/pow/chain/{index}/mine")]
pub async fn mine_chain_block(
    state: web::Data<AppState>,
    path: web::Path<usize>,
) -> DemoResult<HttpResponse> {
    let index = path.into_inner();
    let ((height, data), difficulty) = {
        let chain = state.chain.lock().expect("mutex poisoned");
        (chain.mining_input(index)?, chain.difficulty)
    };

    let report =
        search_cooperative(height, data.as_bytes(), difficulty, state.config.max_nonce).await?;

    let mut chain = state.chain.lock().expect("mutex poisoned");
    chain.apply_mined(index, &data, &report.outcome)?;
    if let MineOutcome::Found { nonce, .. } = &report.outcome {
        info!("POW - sealed chain block #{index} nonce={nonce}");
    }
    Ok(ok_json(chain_view(&chain)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::api::{AppState, init_routes};

    #[actix_web::test]
    async fn mine_endpoint_finds_known_nonce() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/pow/mine")
            .set_json(json!({"height": 1, "data": "", "difficulty": 4}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["outcome"]["status"], "found");
        assert_eq!(body["data"]["outcome"]["nonce"], 72608);
        assert_eq!(body["data"]["stats"]["hashes_computed"], 72609);
    }

    #[actix_web::test]
    async fn exhausted_mine_is_still_success() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/pow/mine")
            .set_json(json!({"height": 1, "difficulty": 4, "maxNonce": 10}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["outcome"]["status"], "not_found");
    }

    #[actix_web::test]
    async fn bad_difficulty_is_rejected() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/pow/hash")
            .set_json(json!({"height": 1, "nonce": 0, "difficulty": 9}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn height_zero_is_rejected() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        for uri in ["/api/pow/mine", "/api/pow/hash"] {
            let req = test::TestRequest::post()
                .uri(uri)
                .set_json(json!({"height": 0, "nonce": 0, "difficulty": 1}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], 40000);
        }
    }

    #[actix_web::test]
    async fn hash_endpoint_reports_digest() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/pow/hash")
            .set_json(json!({"height": 1, "nonce": 72608, "difficulty": 4}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["data"]["hash"],
            "0000f727854b50bb95c054b39c1fe5c92e5ebcfa4bcb5dc279f56aa96a365e5a"
        );
        assert_eq!(body["data"]["valid"], true);
    }

    #[actix_web::test]
    async fn chain_edit_and_remine() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::put()
            .uri("/api/pow/chain/0")
            .set_json(json!({"data": "hello", "nonce": 264}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let first = &body["data"]["blocks"][0];
        assert_eq!(first["data"], "hello");
        assert_eq!(body["data"]["blocks"][1]["previous_hash"], first["hash"]);

        let req = test::TestRequest::post()
            .uri("/api/pow/chain/0/mine")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["blocks"][0]["signed"], true);

        let req = test::TestRequest::post()
            .uri("/api/pow/chain/99/mine")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
