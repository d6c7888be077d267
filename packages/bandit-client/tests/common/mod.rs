//! Stub of the remote bandit service for integration tests.
//!
//! Serves account 123, lab `l1`:
//! - `abc123`, `newuserid`: suggestion v1/e1 with content and reward token
//! - `rewarded`: suggestion v2/e2 without content or reward token
//! - `badresponse`: 400 with a `{message, code}` body
//! - `garbled`: 200 with a body that is not JSON
//! - any other user or path: 404
//!
//! `POST /reward` accepts the tokens `secretToken==` and `token1==`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use bandit_client::testing::FixedIdentifier;
use bandit_client::BanditClient;

pub const ACCOUNT_ID: i64 = 123;
pub const LAB_ID: &str = "l1";
pub const VALID_TOKENS: [&str; 2] = ["secretToken==", "token1=="];

pub const SUGGESTION_BODY: &str = r#"{
  "variant_id": "v1",
  "experiment_id": "e1",
  "content": "{\"key\": 22}",
  "reward_token": "token1=="
}"#;

/// A running stub with a counter of requests it has received.
pub struct StubService {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubService {
    pub async fn spawn() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .route(
                &format!("/accounts/{ACCOUNT_ID}/labs/{LAB_ID}/suggest"),
                get(suggest),
            )
            .route("/reward", post(reward))
            .fallback(not_found)
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// A client for the stub's lab whose new visitors get the id `newuserid`.
    pub fn client(&self) -> BanditClient {
        BanditClient::new(ACCOUNT_ID, LAB_ID)
            .with_base_url(self.base_url.clone())
            .with_id_generator(Arc::new(FixedIdentifier::new("newuserid")))
    }
}

async fn suggest(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    match params.get("user").map(String::as_str) {
        Some("abc123") | Some("newuserid") => SUGGESTION_BODY.into_response(),
        Some("rewarded") => r#"{"variant_id": "v2", "experiment_id": "e2"}"#.into_response(),
        Some("badresponse") => (
            StatusCode::BAD_REQUEST,
            r#"{"message": "problem", "code": 400}"#,
        )
            .into_response(),
        Some("garbled") => "<html>oops</html>".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn reward(
    State(hits): State<Arc<AtomicUsize>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    if form
        .get("token")
        .is_some_and(|token| VALID_TOKENS.contains(&token.as_str()))
    {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            r#"{"message": "reward problem", "code": 400}"#,
        )
            .into_response()
    }
}

async fn not_found(State(hits): State<Arc<AtomicUsize>>) -> StatusCode {
    hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::NOT_FOUND
}
