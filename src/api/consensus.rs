use actix_web::{HttpResponse, get, post, web};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::envelope::{ApiResponse, ok_json};
use super::models::{
    AppState, BftRequest, BftResponse, ElectRequest, ElectResponse, PohRequest, PohResponse,
    PoolResponse, SelectRequest, SelectResponse, StakeRequest,
};
use crate::consensus::{BftRound, DelegateElection, PohTimeline, StakePool, select_weighted};
use crate::error::{DemoError, DemoResult};

/// Largest BFT network the simulator accepts.
const MAX_BFT_NODES: usize = 100;

/// Largest PoH timeline the endpoint will build.
const MAX_POH_ENTRIES: usize = 10_000;

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn pool_view(pool: &StakePool) -> PoolResponse {
    PoolResponse {
        validators: pool.validators().to_vec(),
        total_stake: pool.total_stake(),
        log: pool.log().to_vec(),
    }
}

#[get("/pos/validators")]
pub async fn get_validators(state: web::Data<AppState>) -> HttpResponse {
    let pool = state.stake_pool.lock().expect("mutex poisoned");
    ok_json(pool_view(&pool))
}

/// Stake-weighted draw. With an explicit list the draw is stateless;
/// otherwise the shared pool is used and the pick is logged.
#[post("/pos/select")]
pub async fn select_validator(
    state: web::Data<AppState>,
    req: web::Json<SelectRequest>,
) -> HttpResponse {
    let req = req.into_inner();
    let mut rng = rng_from(req.seed);

    let resp = match req.validators {
        Some(list) => SelectResponse {
            selected: select_weighted(&list, &mut rng).cloned(),
            record: None,
        },
        None => {
            let mut pool = state.stake_pool.lock().expect("mutex poisoned");
            let record = pool.select(&mut rng).cloned();
            let selected = record.as_ref().and_then(|r| {
                pool.validators()
                    .iter()
                    .find(|v| v.id == r.validator_id)
                    .cloned()
            });
            SelectResponse { selected, record }
        }
    };

    if resp.selected.is_some() {
        HttpResponse::Ok().json(ApiResponse::ok(resp))
    } else {
        debug!("POS - no validator selected (zero total stake)");
        HttpResponse::Ok().json(ApiResponse::ok_with_message(resp, "total stake is zero"))
    }
}

#[post("/pos/stake")]
pub async fn stake(
    state: web::Data<AppState>,
    req: web::Json<StakeRequest>,
) -> DemoResult<HttpResponse> {
    let mut pool = state.stake_pool.lock().expect("mutex poisoned");
    pool.stake(&req.id, req.amount)?;
    Ok(ok_json(pool_view(&pool)))
}

#[post("/pos/unstake")]
pub async fn unstake(
    state: web::Data<AppState>,
    req: web::Json<StakeRequest>,
) -> DemoResult<HttpResponse> {
    let mut pool = state.stake_pool.lock().expect("mutex poisoned");
    pool.unstake(&req.id, req.amount)?;
    Ok(ok_json(pool_view(&pool)))
}

#[post("/dpos/elect")]
pub async fn elect(req: web::Json<ElectRequest>) -> DemoResult<HttpResponse> {
    let req = req.into_inner();
    let mut election = DelegateElection::new(req.candidates);
    for ballot in &req.ballots {
        election.cast_vote(&ballot.voter, ballot.stake, &ballot.candidate)?;
    }
    Ok(ok_json(ElectResponse {
        producers: election.elect(req.seats),
        tally: election.tally(),
    }))
}

#[post("/bft/simulate")]
pub async fn simulate_bft(req: web::Json<BftRequest>) -> DemoResult<HttpResponse> {
    if req.nodes > MAX_BFT_NODES {
        return Err(DemoError::InvalidInput(format!(
            "at most {MAX_BFT_NODES} nodes"
        )));
    }
    let mut round = match req.random_faults {
        Some(count) => BftRound::with_random_faults(req.nodes, count, &mut rng_from(req.seed))?,
        None => BftRound::new(req.nodes, &req.faulty)?,
    };
    let outcome = round.run();
    Ok(ok_json(BftResponse {
        outcome,
        fault_tolerance: round.fault_tolerance(),
        quorum: round.quorum(),
        faulty: round
            .nodes()
            .iter()
            .filter(|n| n.faulty)
            .map(|n| n.id)
            .collect(),
        trace: round.trace().to_vec(),
    }))
}

#[post("/poh/timeline")]
pub async fn poh_timeline(req: web::Json<PohRequest>) -> DemoResult<HttpResponse> {
    let req = req.into_inner();
    let size = req
        .ticks_between
        .checked_add(1)
        .and_then(|per_event| per_event.checked_mul(req.events.len() + 1));
    if size.is_none_or(|size| size > MAX_POH_ENTRIES) {
        return Err(DemoError::InvalidInput(format!(
            "timeline would exceed {MAX_POH_ENTRIES} entries"
        )));
    }

    let mut timeline = PohTimeline::new(req.seed);
    for event in req.events {
        timeline.ticks(req.ticks_between);
        timeline.record(event);
    }
    timeline.ticks(req.ticks_between);

    Ok(ok_json(PohResponse {
        tip: timeline.tip(),
        verified: timeline.verify(),
        entries: timeline.entries().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::api::{AppState, init_routes};

    #[actix_web::test]
    async fn pool_selection_is_logged() {
        let state = web::Data::new(AppState::default());
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/pos/select")
                .set_json(json!({"seed": 9}))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["success"], true);
            assert!(body["data"]["selected"]["id"].is_string());
        }
        assert_eq!(state.stake_pool.lock().unwrap().log().len(), 3);
    }

    #[actix_web::test]
    async fn zero_stake_list_selects_nobody() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/pos/select")
            .set_json(json!({"validators": [{"id": "a", "stake": 0.0}]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["selected"].is_null());
    }

    #[actix_web::test]
    async fn bft_and_dpos_and_poh() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/bft/simulate")
            .set_json(json!({"nodes": 4, "faulty": [3]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["outcome"], "decided");
        assert_eq!(body["data"]["quorum"], 3);

        let req = test::TestRequest::post()
            .uri("/api/dpos/elect")
            .set_json(json!({
                "candidates": ["d1", "d2"],
                "ballots": [{"voter": "v", "stake": 5.0, "candidate": "d2"}],
                "seats": 1
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["producers"][0]["candidate"], "d2");

        let req = test::TestRequest::post()
            .uri("/api/poh/timeline")
            .set_json(json!({"seed": "s", "ticksBetween": 2, "events": ["a", "b"]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["verified"], true);
        assert_eq!(body["data"]["entries"].as_array().unwrap().len(), 8);
    }

    #[actix_web::test]
    async fn oversized_poh_timeline_is_rejected() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        for ticks in [u64::MAX, 10_000] {
            let req = test::TestRequest::post()
                .uri("/api/poh/timeline")
                .set_json(json!({"seed": "s", "ticksBetween": ticks}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["success"], false);
        }
    }
}
