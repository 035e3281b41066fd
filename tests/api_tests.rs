use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::json;

use marquee_api::api::{create_router, AppState};
use marquee_api::db::{MemoryStore, Store};
use marquee_api::error::AppResult;
use marquee_api::models::{InteractionType, Movie, User};
use marquee_api::services::backends::RecommendBackend;
use marquee_api::services::{ModelKind, ModelRegistry, TokenService};

const SECRET: &str = "integration-test-secret";

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

/// Writes an EASE checkpoint so that context [1, 2] ranks [3, 99, 4];
/// 99 has no catalog entry and must be dropped from the response.
fn write_checkpoints() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("marquee-ckpt-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("EASE_100.json"),
        serde_json::to_vec(&json!({
            "1": [[3, 0.9], [99, 0.8]],
            "2": [[4, 0.7], [3, 0.2]],
        }))
        .unwrap(),
    )
    .unwrap();
    dir
}

async fn seed_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (id, title, genre, date) in [
        (1, "Toy Story", "Animation", NaiveDate::from_ymd_opt(1995, 11, 22)),
        (2, "Heat", "Crime", NaiveDate::from_ymd_opt(1995, 12, 15)),
        (3, "Casino", "Crime", NaiveDate::from_ymd_opt(1995, 11, 22)),
        (4, "Se7en", "Thriller", None),
    ] {
        store
            .insert_movie(Movie {
                id,
                title: title.to_string(),
                genre: genre.to_string(),
                date,
            })
            .await;
    }
    store
        .insert_user(User {
            id: 7,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            age: 30,
            gender: "F".to_string(),
            is_active: true,
        })
        .await;
    store
}

async fn create_test_server() -> (TestServer, Arc<MemoryStore>, TokenService) {
    let store = seed_store().await;
    let registry = ModelRegistry::with_defaults(&write_checkpoints(), Duration::from_secs(5));
    let tokens = TokenService::new(SECRET);

    let state = AppState::new(store.clone(), registry, tokens.clone());
    let server = TestServer::new(create_router(state)).unwrap();
    (server, store, tokens)
}

async fn wait_for_interaction(store: &MemoryStore, user_id: i64, movie_id: i64) -> bool {
    for _ in 0..50 {
        if store
            .interaction(user_id, movie_id)
            .await
            .unwrap()
            .is_some()
        {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_health_check() {
    let (server, _, _) = create_test_server().await;
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_unknown_route_is_404_with_code() {
    let (server, _, _) = create_test_server().await;
    let response = server.get("/nope").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_init_returns_catalog_sorted_with_formatted_dates() {
    let (server, _, _) = create_test_server().await;

    let response = server.get("/init").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let items = body["result"].as_array().unwrap();
    assert_eq!(items.len(), 4);
    let ids: Vec<i64> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(items[1]["date"], "1995-Dec-15");
    assert_eq!(items[3]["date"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_recommend_without_body_is_missing_data() {
    let (server, _, _) = create_test_server().await;
    let response = server.post("/recommend").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "MISSING_DATA");
}

#[tokio::test]
async fn test_recommend_empty_context_is_missing_context() {
    let (server, _, _) = create_test_server().await;
    let response = server
        .post("/recommend")
        .json(&json!({ "context": [], "model": "EASE" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "MISSING_CONTEXT");
}

#[tokio::test]
async fn test_recommend_missing_model_is_missing_model() {
    let (server, _, _) = create_test_server().await;
    let response = server
        .post("/recommend")
        .json(&json!({ "context": [1, 2] }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "MISSING_MODEL");
}

#[tokio::test]
async fn test_recommend_unknown_model_is_400() {
    let (server, _, _) = create_test_server().await;
    let response = server
        .post("/recommend")
        .json(&json!({ "context": [1], "model": "WideAndDeep" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "UNKNOWN_MODEL");
}

#[tokio::test]
async fn test_recommend_anonymous_serves_catalog_filtered_order() {
    let (server, store, _) = create_test_server().await;

    let response = server
        .post("/recommend")
        .json(&json!({ "context": [1, 2], "model": "EASE", "top_k": 5 }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    // Backend ranks [3, 99, 4]; 99 is not in the catalog and is dropped.
    let items = body["result"].as_array().unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![3, 4]);
    assert_eq!(items[0]["title"], "Casino");
    assert_eq!(items[0]["date"], "1995-Nov-22");

    // Anonymous: served but never attributed.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.interaction(7, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_recommend_placeholder_model_is_empty_result() {
    let (server, _, _) = create_test_server().await;

    let response = server
        .post("/recommend")
        .json(&json!({ "context": [1], "model": "NeuralMF" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_recommend_with_token_logs_interactions() {
    let (server, store, tokens) = create_test_server().await;
    let token = tokens.issue(7, "ada").unwrap();

    let response = server
        .post("/recommend")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "context": [1, 2], "model": "EASE" }))
        .await;
    response.assert_status_ok();

    // Every ranked id gets a record, including 99, which has no catalog row.
    assert!(wait_for_interaction(&store, 7, 3).await);
    assert!(wait_for_interaction(&store, 7, 4).await);
    assert!(wait_for_interaction(&store, 7, 99).await);
    let record = store.interaction(7, 3).await.unwrap().unwrap();
    assert_eq!(record.interaction_type, InteractionType::Recommend);
}

#[tokio::test]
async fn test_recommend_logging_does_not_clobber_prior_rating() {
    let (server, store, tokens) = create_test_server().await;
    store
        .upsert_interaction(7, 3, InteractionType::Rate, Some(5.0), 100)
        .await
        .unwrap();

    let token = tokens.issue(7, "ada").unwrap();
    server
        .post("/recommend")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "context": [1, 2], "model": "EASE" }))
        .await
        .assert_status_ok();

    assert!(wait_for_interaction(&store, 7, 4).await);
    let record = store.interaction(7, 3).await.unwrap().unwrap();
    assert_eq!(record.interaction_type, InteractionType::Rate);
    assert_eq!(record.rating, Some(5.0));
}

#[tokio::test]
async fn test_recommend_invalid_token_still_serves() {
    let (server, store, _) = create_test_server().await;

    let response = server
        .post("/recommend")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"))
        .json(&json!({ "context": [1, 2], "model": "EASE" }))
        .await;
    response.assert_status_ok();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.interaction(7, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_recommend_broken_checkpoint_is_api_error() {
    let (server, _, _) = create_test_server().await;

    // ItemKNN has no checkpoint file in the test dir, so its load fails.
    let response = server
        .post("/recommend")
        .json(&json!({ "context": [1], "model": "ItemKNN" }))
        .await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "API_ERROR");
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_recommend_timeout_is_api_error() {
    struct SlowBackend;

    #[async_trait::async_trait]
    impl RecommendBackend for SlowBackend {
        async fn restore(&self, _checkpoint: &Path) -> AppResult<()> {
            Ok(())
        }

        async fn recommend(&self, _context: &[i64], _top_k: usize) -> AppResult<Vec<i64>> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(vec![1])
        }
    }

    let store = seed_store().await;
    let mut registry = ModelRegistry::new(Duration::from_millis(50));
    registry.register(ModelKind::Ease, Arc::new(SlowBackend), Path::new("ckpt"));
    let state = AppState::new(store, registry, TokenService::new(SECRET));
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server
        .post("/recommend")
        .json(&json!({ "context": [1], "model": "EASE" }))
        .await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "API_ERROR");
}

#[tokio::test]
async fn test_interactions_require_token() {
    let (server, _, _) = create_test_server().await;

    let response = server
        .post("/api/interactions")
        .json(&json!({ "movie_id": 1 }))
        .await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);

    let response = server.get("/api/interactions").await;
    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_and_list_interactions() {
    let (server, _, tokens) = create_test_server().await;
    let token = tokens.issue(7, "ada").unwrap();

    let response = server
        .post("/api/interactions")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movie_id": 2, "interaction_type": "rate", "rating": 4.5 }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["interaction"]["interaction_type"], "rate");
    assert_eq!(body["interaction"]["rating"], 4.5);

    let response = server
        .get("/api/interactions")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["interactions"][0]["movie_id"], 2);
}

#[tokio::test]
async fn test_save_interaction_overwrites_type() {
    let (server, store, tokens) = create_test_server().await;
    store
        .upsert_interaction(7, 2, InteractionType::Recommend, None, 100)
        .await
        .unwrap();

    let token = tokens.issue(7, "ada").unwrap();
    server
        .post("/api/interactions")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movie_id": 2, "interaction_type": "select" }))
        .await
        .assert_status_ok();

    let record = store.interaction(7, 2).await.unwrap().unwrap();
    assert_eq!(record.interaction_type, InteractionType::Select);
}

#[tokio::test]
async fn test_save_interaction_unknown_movie_is_404() {
    let (server, _, tokens) = create_test_server().await;
    let token = tokens.issue(7, "ada").unwrap();

    let response = server
        .post("/api/interactions")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movie_id": 12345 }))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_interaction_invalid_type_is_400() {
    let (server, _, tokens) = create_test_server().await;
    let token = tokens.issue(7, "ada").unwrap();

    let response = server
        .post("/api/interactions")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "movie_id": 1, "interaction_type": "like" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_skips_invalid_entries() {
    let (server, store, tokens) = create_test_server().await;
    let token = tokens.issue(7, "ada").unwrap();

    let response = server
        .post("/api/interactions/batch")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "interactions": [
            { "movie_id": 1, "interaction_type": "view" },
            { "movie_id": 12345 },
            { "interaction_type": "select" },
            { "movie_id": 2, "interaction_type": "select" },
        ]}))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 2);

    assert!(store.interaction(7, 1).await.unwrap().is_some());
    assert!(store.interaction(7, 2).await.unwrap().is_some());
}
