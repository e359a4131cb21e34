//! HTTP server for medchain.
//!
//! A thin transport over one shared [`MedicalLedger`](medchain_ledger::MedicalLedger):
//! chain export, tail lookup, transaction intake and wallet address
//! assignment.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::MedchainServer;

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use medchain_ledger::{AppendError, ValidationError};
    use medchain_types::BlockHash;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::*;

    fn app(config: ServerConfig) -> Router {
        MedchainServer::new(config).unwrap().router()
    }

    async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, text) = send_raw(app, request).await;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = app(ServerConfig::default());
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn fresh_chain_holds_genesis() {
        let app = app(ServerConfig::default());
        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        let blocks = body.as_array().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0]["position"], 0);
        assert_eq!(blocks[0]["data"]["is_genesis"], true);
        assert_eq!(blocks[0]["previousHash"], "0".repeat(64));
    }

    #[tokio::test]
    async fn transaction_appends_block() {
        let app = app(ServerConfig::default());
        let tx = json!({
            "wallet_address": "w1",
            "user_id": "u1",
            "user_role": "doctor",
            "updated_key": "allergies",
            "updated_value": "penicillin",
        });

        let (status, block) = send(&app, post_json("/transaction", &tx)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(block["position"], 1);
        assert_eq!(block["data"]["updated_value"], "penicillin");

        let (_, chain) = send(&app, get("/")).await;
        let blocks = chain.as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1]["previousHash"], blocks[0]["hash"]);
        assert_eq!(blocks[1]["hash"], block["hash"]);

        let (_, tail) = send(&app, get("/tail")).await;
        assert_eq!(tail["hash"], block["hash"]);
    }

    #[tokio::test]
    async fn malformed_transaction_is_bad_request() {
        let app = app(ServerConfig::default());
        let request = Request::builder()
            .method("POST")
            .uri("/transaction")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["retryable"], false);

        let (_, chain) = send(&app, get("/")).await;
        assert_eq!(chain.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn disallowed_role_is_forbidden() {
        let app = app(ServerConfig {
            allowed_roles: Some(vec!["doctor".into()]),
            ..ServerConfig::default()
        });
        let tx = json!({ "wallet_address": "w1", "user_id": "p1", "user_role": "patient" });
        let (status, body) = send(&app, post_json("/transaction", &tx)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["retryable"], false);
        assert!(body["error"].as_str().unwrap().contains("patient"));

        let (_, chain) = send(&app, get("/")).await;
        assert_eq!(chain.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn responses_are_compact_by_default() {
        let app = app(ServerConfig::default());
        let (status, text) = send_raw(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!text.contains('\n'));
    }

    #[tokio::test]
    async fn pretty_json_indents_responses() {
        let app = app(ServerConfig {
            pretty_json: true,
            ..ServerConfig::default()
        });
        let (status, text) = send_raw(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains('\n'));
        let blocks: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(blocks.as_array().unwrap().len(), 1);

        let tx = json!({ "wallet_address": "w1", "updated_key": "k", "updated_value": "v" });
        let (status, text) = send_raw(&app, post_json("/transaction", &tx)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains('\n'));
        let block: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(block["position"], 1);
    }

    #[tokio::test]
    async fn rejected_append_reports_error_body() {
        let conflict = || async {
            ServerError::from(AppendError::from(ValidationError::LinkageMismatch {
                expected: BlockHash::ZERO,
                found: BlockHash::from_bytes([1; 32]),
            }))
        };
        let app: Router = Router::new().route("/stale", axum::routing::post(conflict));
        let (status, body) = send(&app, post_json("/stale", &json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["retryable"], true);
        assert!(body["error"].as_str().unwrap().contains("linkage mismatch"));
    }

    #[tokio::test]
    async fn wallet_gets_derived_address() {
        let app = app(ServerConfig::default());
        let record = json!({ "full_name": "Jane Doe", "creation_date": "2024-01-01" });
        let (status, body) = send(&app, post_json("/wallet", &record)).await;
        assert_eq!(status, StatusCode::OK);
        let address = body["wallet_address"].as_str().unwrap();
        assert_eq!(address.len(), 32);
        assert_eq!(body["full_name"], "Jane Doe");

        let (_, again) = send(&app, post_json("/wallet", &record)).await;
        assert_eq!(again["wallet_address"], address);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = app(ServerConfig {
            max_body_bytes: 16,
            ..ServerConfig::default()
        });
        let tx = json!({ "wallet_address": "w".repeat(64) });
        let (status, _) = send(&app, post_json("/transaction", &tx)).await;
        assert!(status.is_client_error());

        let (_, chain) = send(&app, get("/")).await;
        assert_eq!(chain.as_array().unwrap().len(), 1);
    }
}
