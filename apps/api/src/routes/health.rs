use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "pathfinder-api"
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::llm_client::mock::ScriptedModel;
    use crate::test_support::{get, Harness};

    #[tokio::test]
    async fn test_health_reports_service() {
        let (status, body) = Harness::new(ScriptedModel::default()).send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "pathfinder-api");
    }
}
