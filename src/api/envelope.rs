use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Application-level success code.
pub const CODE_OK: u16 = 200;

/// JSON envelope returned by every endpoint: `{success, data, message, code}`.
/// Clients decide on `success`, not on the HTTP status alone.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub code: u16,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "ok".to_string(),
            code: CODE_OK,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            code: CODE_OK,
        }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            code,
        }
    }
}

/// Shorthand for a 200 response wrapping `data` in a success envelope.
pub fn ok_json<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data))
}

#[cfg(test)]
mod tests {
    use super::ApiResponse;

    #[test]
    fn failure_has_no_data() {
        let resp = ApiResponse::<u32>::failure(40400, "missing");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["code"], 40400);
        assert_eq!(json["message"], "missing");
    }
}
