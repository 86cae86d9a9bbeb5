//! End-to-end tests for the listing API.
//!
//! Each test starts its own server on an ephemeral port backed by the mock
//! dataset. The remote tests add a second server whose data source is the
//! first one, exercising the offset/limit query convention over HTTP.

use axum::{extract::Query, routing::get, Json, Router};
use factdesk::config::{AppConfig, DataSourceConfig, RemotePaging};
use factdesk::db::fixtures;
use factdesk::models::topic::Topic;
use factdesk::AppState;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Spin up the full Axum app on a random port, returning its base URL and
/// a handle to stop the server.
async fn start_server(config: AppConfig) -> (String, tokio::task::JoinHandle<()>) {
    let state = AppState::from_config(config).expect("state");
    let app = factdesk::routes::build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (base_url, handle)
}

async fn start_mock() -> (String, tokio::task::JoinHandle<()>) {
    start_server(AppConfig::mock()).await
}

/// A server reading everything from `upstream` through the remote source.
async fn start_remote(upstream: &str) -> (String, tokio::task::JoinHandle<()>) {
    start_remote_with(upstream, RemotePaging::Server).await
}

async fn start_remote_with(
    upstream: &str,
    paging: RemotePaging,
) -> (String, tokio::task::JoinHandle<()>) {
    let config = AppConfig {
        data_source: DataSourceConfig::Remote {
            base_url: format!("{upstream}/api/v1"),
            paging,
            timeout_secs: 5,
        },
        ..AppConfig::mock()
    };
    start_server(config).await
}

/// Upstream answering topic listings with bare arrays cut by offset/limit,
/// and totals only from `/topics/count`.
async fn start_bare_upstream() -> (String, tokio::task::JoinHandle<()>) {
    async fn topics(Query(window): Query<HashMap<String, usize>>) -> Json<Vec<Topic>> {
        let offset = window.get("offset").copied().unwrap_or(0);
        let limit = window.get("limit").copied().unwrap_or(usize::MAX);
        Json(fixtures::topics().into_iter().skip(offset).take(limit).collect())
    }

    async fn count() -> Json<Value> {
        Json(json!({ "total": fixtures::topics().len() }))
    }

    let app = Router::new()
        .route("/api/v1/topics", get(topics))
        .route("/api/v1/topics/count", get(count));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    (base_url, handle)
}

/// Helper: extract `data` from the API envelope, panic with message on error.
fn extract_data(body: &Value) -> &Value {
    if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
        panic!(
            "API error: {}: {}",
            err["code"].as_str().unwrap_or("?"),
            err["message"].as_str().unwrap_or("?"),
        );
    }
    body.get("data").expect("missing 'data' field")
}

async fn get_json(client: &Client, url: &str) -> (StatusCode, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

fn codes(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_probes() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let resp = client.get(format!("{base}/health/live")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "OK");

    let (status, body) = get_json(&client, &format!("{base}/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    let health = extract_data(&body);
    assert_eq!(health["data_source"], "connected");
    assert_eq!(health["mode"], "mock");
}

#[tokio::test]
async fn topics_are_paged_and_filtered() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?page=1&pageSize=5")).await;
    let page = extract_data(&body);
    assert_eq!(codes(page), vec!["T001", "T002", "T003", "T004", "T005"]);
    assert_eq!(page["page"], 1);
    assert_eq!(page["pageSize"], 5);
    assert_eq!(page["totalItems"], 12);
    assert_eq!(page["totalPages"], 3);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?page=4&pageSize=5")).await;
    let beyond = extract_data(&body);
    assert!(codes(beyond).is_empty());
    assert_eq!(beyond["totalItems"], 12);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?in_statuses=REJECTED")).await;
    assert_eq!(codes(extract_data(&body)), vec!["T003", "T009"]);

    let (_, body) = get_json(
        &client,
        &format!("{base}/api/v1/topics?codeLike=t00&idNotIn=1,2,3&like_message_text=TOPIC"),
    )
    .await;
    assert_eq!(codes(extract_data(&body)), vec!["T004"]);
}

#[tokio::test]
async fn offset_limit_and_defaults() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?offset=10&limit=5")).await;
    let page = extract_data(&body);
    assert_eq!(page["page"], 3);
    assert_eq!(codes(page), vec!["T011", "T012"]);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?page=0&pageSize=-3")).await;
    let clamped = extract_data(&body);
    assert_eq!(clamped["page"], 1);
    assert_eq!(clamped["pageSize"], 1);
    assert_eq!(clamped["totalPages"], 12);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics")).await;
    assert_eq!(extract_data(&body)["pageSize"], 10);
}

#[tokio::test]
async fn malformed_queries_are_rejected() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let (status, body) =
        get_json(&client, &format!("{base}/api/v1/topics?in_statuses=PENDING,BOGUS")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = get_json(&client, &format!("{base}/api/v1/topics?page=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn counts_per_status() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/count")).await;
    let counts = extract_data(&body);
    assert_eq!(counts["total"], 12);
    assert_eq!(counts["PENDING"], 4);
    assert_eq!(counts["ANSWERED"], 3);
    assert_eq!(counts["REJECTED"], 2);
    assert_eq!(counts["APPROVED"], 3);

    let (_, body) = get_json(
        &client,
        &format!("{base}/api/v1/topics/count?in_statuses=PENDING,ANSWERED&codeLike=T00"),
    )
    .await;
    let scoped = extract_data(&body);
    // T001..T009: pending 1,5,6 and answered 2,7.
    assert_eq!(scoped["total"], 5);
    assert_eq!(scoped["REJECTED"], 2);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/message-groups/count")).await;
    let groups = extract_data(&body);
    assert_eq!(groups["total"], 10);
    assert_eq!(groups["MGROUP_PENDING"], 5);
}

#[tokio::test]
async fn topic_detail_and_children() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/3")).await;
    let topic = extract_data(&body);
    assert_eq!(topic["code"], "T003");
    assert_eq!(topic["createDate"], "2023-10-03T09:15:00Z");

    let (status, body) = get_json(&client, &format!("{base}/api/v1/topics/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/1/message-group")).await;
    let groups = extract_data(&body).as_array().unwrap().clone();
    assert_eq!(groups.len(), 3);
    assert!(groups.iter().all(|g| g["topic_id"] == "1"));

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/1/messages")).await;
    assert_eq!(extract_data(&body).as_array().unwrap().len(), 3);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/2/answer")).await;
    assert!(extract_data(&body).is_null());

    let (_, body) = get_json(
        &client,
        &format!("{base}/api/v1/topics/1/audit-logs?types=UPDATE_ANSWER"),
    )
    .await;
    let logs = extract_data(&body).as_array().unwrap().clone();
    assert_eq!(logs.len(), 3);
    assert!(logs.iter().all(|l| l["status"] == "UPDATE_ANSWER"));
}

#[tokio::test]
async fn moderation_updates_listings_and_audit_trail() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let resp: Value = client
        .patch(format!("{base}/api/v1/topics/2/approve"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(extract_data(&resp)["status"], "APPROVED");

    let resp = client
        .patch(format!("{base}/api/v1/topics/2/reject"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/count")).await;
    assert_eq!(extract_data(&body)["APPROVED"], 4);

    let (_, body) = get_json(
        &client,
        &format!("{base}/api/v1/topics/2/audit-logs?types=APPROVED"),
    )
    .await;
    let logs = extract_data(&body).as_array().unwrap().clone();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1]["username"], "backoffice");

    let resp: Value = client
        .put(format!("{base}/api/v1/message-groups/1/status"))
        .json(&json!({ "status": "MGROUP_APPROVED" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(extract_data(&resp)["status"], "MGROUP_APPROVED");

    let resp = client
        .put(format!("{base}/api/v1/message-groups/1/status"))
        .json(&json!({ "status": "NOT_A_STATUS" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn answering_a_topic() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let resp: Value = client
        .put(format!("{base}/api/v1/topics/5/answer"))
        .json(&json!({ "answer": "Hot water does not cure the flu.", "type": "FAKE" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(extract_data(&resp)["type"], "FAKE");

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/5")).await;
    assert_eq!(extract_data(&body)["status"], "ANSWERED");

    let resp = client
        .put(format!("{base}/api/v1/topics/5/answer"))
        .json(&json!({ "answer": "", "type": "REAL" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/dashboard/stats")).await;
    let stats = extract_data(&body);
    assert_eq!(stats["verdicts"]["fake"], 2);
    assert_eq!(stats["topics"]["ANSWERED"], 4);
}

#[tokio::test]
async fn ask_flow() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let resp: Value = client
        .post(format!("{base}/api/v1/ask"))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let known = extract_data(&resp);
    assert_eq!(known["hasAnswer"], true);
    assert_eq!(known["answer"], "This is answer");

    let resp: Value = client
        .post(format!("{base}/api/v1/ask"))
        .json(&json!({ "message": "Are banks closing?" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let fresh = extract_data(&resp).clone();
    assert_eq!(fresh["hasAnswer"], false);
    assert!(fresh.get("answer").is_none());

    let id = fresh["id"].as_str().unwrap();
    let (status, body) = get_json(&client, &format!("{base}/api/v1/ask/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(extract_data(&body)["code"], fresh["code"]);

    let (status, _) = get_json(&client, &format!("{base}/api/v1/ask/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("{base}/api/v1/ask"))
        .json(&json!({ "message": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remote_source_mirrors_upstream_listing() {
    let (upstream, _upstream_handle) = start_mock().await;
    let (base, _handle) = start_remote(&upstream).await;
    let client = Client::new();

    for query in [
        "page=1&pageSize=5",
        "page=3&pageSize=5",
        "in_statuses=PENDING,ANSWERED&pageSize=3&page=2",
        "codeLike=T01&like_message_text=e",
        "idNotIn=1,2,3,4,5,6,7,8,9,10",
    ] {
        let (_, direct) = get_json(&client, &format!("{upstream}/api/v1/topics?{query}")).await;
        let (_, remote) = get_json(&client, &format!("{base}/api/v1/topics?{query}")).await;
        assert_eq!(extract_data(&remote), extract_data(&direct), "query: {query}");
    }

    let (_, direct) = get_json(&client, &format!("{upstream}/api/v1/topics/count")).await;
    let (_, remote) = get_json(&client, &format!("{base}/api/v1/topics/count")).await;
    assert_eq!(extract_data(&remote), extract_data(&direct));

    let (status, body) = get_json(&client, &format!("{base}/api/v1/topics/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics/1/message-group")).await;
    assert_eq!(extract_data(&body).as_array().unwrap().len(), 3);

    let (_, body) = get_json(&client, &format!("{base}/health/ready")).await;
    assert_eq!(extract_data(&body)["mode"], "remote");
}

#[tokio::test]
async fn remote_mutations_reach_upstream() {
    let (upstream, _upstream_handle) = start_mock().await;
    let (base, _handle) = start_remote(&upstream).await;
    let client = Client::new();

    let resp: Value = client
        .patch(format!("{base}/api/v1/topics/1/reject"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(extract_data(&resp)["status"], "REJECTED");

    let (_, body) = get_json(&client, &format!("{upstream}/api/v1/topics/1")).await;
    assert_eq!(extract_data(&body)["status"], "REJECTED");

    let resp = client
        .patch(format!("{base}/api/v1/topics/4/approve"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .put(format!("{base}/api/v1/message-groups/missing/status"))
        .json(&json!({ "status": "MGROUP_APPROVED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreachable_remote_is_bad_gateway() {
    // Bind and drop a listener to get a port nobody serves.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let (base, _handle) = start_remote(&dead).await;
    let client = Client::new();

    let (status, body) = get_json(&client, &format!("{base}/api/v1/topics")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    let (status, body) = get_json(&client, &format!("{base}/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(extract_data(&body)["data_source"]
        .as_str()
        .unwrap()
        .starts_with("unreachable"));
}

#[tokio::test]
async fn client_paging_sees_the_whole_upstream_collection() {
    let (upstream, _upstream_handle) = start_mock().await;
    let (base, _handle) = start_remote_with(&upstream, RemotePaging::Client).await;
    let client = Client::new();

    // The upstream pages its answer at 10 items by default.
    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?pageSize=20")).await;
    let page = extract_data(&body);
    assert_eq!(page["totalItems"], 12);
    assert_eq!(page["items"].as_array().unwrap().len(), 12);
    assert_eq!(codes(page).last().map(String::as_str), Some("T012"));

    for query in [
        "page=2&pageSize=5",
        "page=3&pageSize=5",
        "in_statuses=PENDING,APPROVED&pageSize=2&page=3",
        "codeLike=T01",
    ] {
        let (_, direct) = get_json(&client, &format!("{upstream}/api/v1/topics?{query}")).await;
        let (_, remote) = get_json(&client, &format!("{base}/api/v1/topics?{query}")).await;
        assert_eq!(extract_data(&remote), extract_data(&direct), "query: {query}");
    }

    let (_, direct) = get_json(&client, &format!("{upstream}/api/v1/topics/count")).await;
    let (_, remote) = get_json(&client, &format!("{base}/api/v1/topics/count")).await;
    assert_eq!(extract_data(&remote)["total"], 12);
    assert_eq!(extract_data(&remote), extract_data(&direct));
}

#[tokio::test]
async fn bare_array_pages_take_totals_from_count() {
    let (upstream, _upstream_handle) = start_bare_upstream().await;
    let (base, _handle) = start_remote(&upstream).await;
    let client = Client::new();

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?page=2&pageSize=5")).await;
    let page = extract_data(&body);
    assert_eq!(codes(page), vec!["T006", "T007", "T008", "T009", "T010"]);
    assert_eq!(page["page"], 2);
    assert_eq!(page["totalItems"], 12);
    assert_eq!(page["totalPages"], 3);

    let (_, body) = get_json(&client, &format!("{base}/api/v1/topics?page=3&pageSize=5")).await;
    assert_eq!(codes(extract_data(&body)), vec!["T011", "T012"]);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let (base, _handle) = start_mock().await;
    let client = Client::new();

    let resp = client
        .post(format!("{base}/api/v1/ask"))
        .json(&json!({ "message": "x".repeat(80 * 1024) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("length limit"));
}
