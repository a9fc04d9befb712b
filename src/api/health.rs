use actix_web::{Responder, get};

use super::envelope::ok_json;

#[get("/health")]
pub async fn health_check() -> impl Responder {
    ok_json("DemoChain API is up and running 🦀")
}
