use axum::Json;

use crate::models::common::MessageResponse;

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        status: "success".to_string(),
        message: "ok".to_string(),
    })
}
