mod access;
mod article;
mod consensus;
pub mod envelope;
mod health;
mod mocks;
pub mod models;
mod pow;
mod prefs;

use actix_web::web::{self, ServiceConfig};

use crate::error::DemoError;

pub use models::AppState;

/// Malformed JSON bodies, query strings and path segments get the same
/// envelope as other errors. A path segment that does not parse names no
/// resource, so it is a not-found.
fn extractor_configs(cfg: &mut ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| DemoError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| DemoError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| DemoError::NotFound(err.to_string()).into()),
    );
}

pub fn init_routes(cfg: &mut ServiceConfig) {
    extractor_configs(cfg);
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .service(pow::mine)
            .service(pow::hash_block)
            .service(pow::get_chain)
            .service(pow::edit_block)
            .service(pow::mine_chain_block)
            .service(consensus::get_validators)
            .service(consensus::select_validator)
            .service(consensus::stake)
            .service(consensus::unstake)
            .service(consensus::elect)
            .service(consensus::simulate_bft)
            .service(consensus::poh_timeline)
            // `page` before `{id}` so it is not read as an id
            .service(article::article_page)
            .service(article::article_by_slug)
            .service(article::article_by_id)
            .service(article::term_page)
            .service(access::plans)
            .service(access::check_access)
            .service(access::usage_summary)
            .service(access::check_limit)
            .service(mocks::list_mocks)
            .service(mocks::create_mock)
            .service(mocks::set_mock_status)
            .service(mocks::get_mock)
            .service(mocks::replace_mock)
            .service(mocks::patch_mock)
            .service(mocks::delete_mock)
            .service(prefs::get_consensus_tab)
            .service(prefs::set_consensus_tab)
            .service(prefs::watch_consensus_tab),
    );
}
