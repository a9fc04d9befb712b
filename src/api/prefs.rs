use actix_web::{HttpResponse, get, put, web};
use log::debug;
use std::time::{Duration, Instant};

use super::envelope::ok_json;
use super::models::{AppState, TabChange, TabPreference, WatchQuery};
use crate::error::DemoResult;
use crate::prefs::CONSENSUS_TAB_KEY;

/// Wait used when the watcher does not ask for one.
const DEFAULT_WATCH_MS: u64 = 25_000;

/// Longest a watcher may hold a request open.
const MAX_WATCH_MS: u64 = 30_000;

#[get("/prefs/consensus-tab")]
pub async fn get_consensus_tab(state: web::Data<AppState>) -> HttpResponse {
    ok_json(TabPreference {
        tab: state.prefs.consensus_tab(),
    })
}

#[put("/prefs/consensus-tab")]
pub async fn set_consensus_tab(
    state: web::Data<AppState>,
    body: web::Json<TabPreference>,
) -> DemoResult<HttpResponse> {
    state.prefs.set_consensus_tab(&body.tab)?;
    Ok(ok_json(TabPreference {
        tab: state.prefs.consensus_tab(),
    }))
}

/// Long-poll for the next tab change so sibling views can follow it.
/// Answers with the current tab and `changed: false` when the wait runs out.
#[get("/prefs/consensus-tab/next")]
pub async fn watch_consensus_tab(
    state: web::Data<AppState>,
    query: web::Query<WatchQuery>,
) -> DemoResult<HttpResponse> {
    let wait = Duration::from_millis(
        query
            .timeout_ms
            .unwrap_or(DEFAULT_WATCH_MS)
            .min(MAX_WATCH_MS),
    );
    let rx = state.prefs.subscribe();

    let next = web::block(move || {
        let deadline = Instant::now() + wait;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(left) {
                Ok(event) if event.key == CONSENSUS_TAB_KEY => return Some(event.value),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    })
    .await?;

    let resp = match next {
        Some(tab) => TabChange { tab, changed: true },
        None => {
            debug!("PREFS - watch timed out after {}ms", wait.as_millis());
            TabChange {
                tab: state.prefs.consensus_tab(),
                changed: false,
            }
        }
    };
    Ok(ok_json(resp))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::thread;
    use std::time::Duration;

    use crate::api::{AppState, init_routes};

    #[actix_web::test]
    async fn tab_update_reaches_subscribers() {
        let state = web::Data::new(AppState::default());
        let rx = state.prefs.subscribe();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/prefs/consensus-tab")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["tab"], "pow");

        let req = test::TestRequest::put()
            .uri("/api/prefs/consensus-tab")
            .set_json(json!({"tab": "poh"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["tab"], "poh");
        assert_eq!(rx.try_recv().unwrap().value, "poh");

        let req = test::TestRequest::put()
            .uri("/api/prefs/consensus-tab")
            .set_json(json!({"tab": "paxos"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn watcher_receives_the_next_change() {
        let state = web::Data::new(AppState::default());
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let writer = state.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            writer.prefs.set_consensus_tab("dpos").unwrap();
        });

        let req = test::TestRequest::get()
            .uri("/api/prefs/consensus-tab/next?timeoutMs=5000")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        handle.join().unwrap();
        assert_eq!(body["data"]["changed"], true);
        assert_eq!(body["data"]["tab"], "dpos");
    }

    #[actix_web::test]
    async fn watcher_times_out_with_current_tab() {
        let state = web::Data::new(AppState::default());
        let app = test::init_service(App::new().app_data(state).configure(init_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/prefs/consensus-tab/next?timeoutMs=20")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["changed"], false);
        assert_eq!(body["data"]["tab"], "pow");
    }
}
