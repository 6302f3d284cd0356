use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use samyama_dag::{router, GraphService, InMemoryGraphStore, PersistentStorage};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(GraphService::new(Arc::new(InMemoryGraphStore::new())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn payload(vertices: &[&str], links: &[(&str, &str)]) -> Value {
    json!({
        "vertices": vertices.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
        "links": links.iter().map(|(s, t)| json!({"source": s, "target": t})).collect::<Vec<_>>(),
    })
}

async fn create(app: &Router, vertices: &[&str], links: &[(&str, &str)]) -> u64 {
    let (status, body) = send(app, "POST", "/api/graph/", Some(payload(vertices, links))).await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn test_create_and_read_adjacency() {
    let app = app();
    let id = create(&app, &["A", "B"], &[("A", "B")]).await;

    let (status, body) = send(&app, "GET", &format!("/api/graph/{}/adjacency_list", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"adjacency": {"A": ["B"], "B": []}}));

    let (status, body) =
        send(&app, "GET", &format!("/api/graph/{}/reverse_adjacency_list", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"adjacency": {"A": [], "B": ["A"]}}));
}

#[tokio::test]
async fn test_get_graph_with_and_without_trailing_slash() {
    let app = app();
    let id = create(&app, &["A", "B"], &[("A", "B")]).await;

    for uri in [format!("/api/graph/{}/", id), format!("/api/graph/{}", id)] {
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": id,
                "vertices": [{"name": "A"}, {"name": "B"}],
                "links": [{"source": "A", "target": "B"}],
            })
        );
    }
}

#[tokio::test]
async fn test_graph_without_links() {
    let app = app();
    let id = create(&app, &["X", "Y"], &[]).await;

    let (status, body) = send(&app, "GET", &format!("/api/graph/{}/", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_cycle_is_rejected() {
    let app = app();
    let (status, body) =
        send(&app, "POST", "/api/graph/", Some(payload(&["A", "B"], &[("A", "B"), ("B", "A")]))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{"loc": ["body"], "msg": "Graph contains a cycle", "type": "value_error"}]})
    );
}

#[tokio::test]
async fn test_self_loop_is_rejected() {
    let app = app();
    let (status, _) = send(&app, "POST", "/api/graph/", Some(payload(&["a"], &[("a", "a")]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_target_is_rejected() {
    let app = app();
    let (status, body) =
        send(&app, "POST", "/api/graph/", Some(payload(&["A"], &[("A", "X")]))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "links", "target"]));
    assert_eq!(body["detail"][0]["msg"], "Vertex X not found");
}

#[tokio::test]
async fn test_unknown_source_is_rejected() {
    let app = app();
    let (status, body) =
        send(&app, "POST", "/api/graph/", Some(payload(&["A"], &[("Q", "R")]))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "links", "source"]));
}

#[tokio::test]
async fn test_empty_vertex_list_is_rejected() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/graph/", Some(payload(&[], &[("A", "B")]))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "vertices"]));
}

#[tokio::test]
async fn test_bad_names_are_rejected_before_validation() {
    let app = app();
    let long = "a".repeat(256);
    let (status, body) = send(
        &app,
        "POST",
        "/api/graph/",
        Some(payload(&["A1", long.as_str()], &[("A1", "Zed")])),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = body["detail"].as_array().unwrap();
    assert_eq!(detail.len(), 3);
    assert_eq!(detail[0]["loc"], json!(["body", "vertices", 0, "name"]));
    assert_eq!(detail[0]["type"], "string_pattern_mismatch");
    assert_eq!(detail[1]["type"], "string_too_long");
    assert_eq!(detail[2]["loc"], json!(["body", "links", 0, "source"]));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/graph/", Some(json!({"nodes": []}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["body"]));
    assert_eq!(body["detail"][0]["type"], "json_invalid");
}

#[tokio::test]
async fn test_duplicate_links_are_rejected_without_partial_graph() {
    let app = app();
    let (status, body) =
        send(&app, "POST", "/api/graph/", Some(payload(&["A", "B"], &[("A", "B"), ("A", "B")]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"][0]["loc"], json!(["body", "links"]));

    let (_, status_body) = send(&app, "GET", "/api/status", None).await;
    assert_eq!(status_body["graphs"], 0);
}

#[tokio::test]
async fn test_missing_graph() {
    let app = app();
    for uri in [
        "/api/graph/9999/",
        "/api/graph/9999/adjacency_list",
        "/api/graph/9999/reverse_adjacency_list",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Graph not found"}));
    }
}

#[tokio::test]
async fn test_non_integer_graph_id() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/graph/abc/", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "int_parsing");
}

#[tokio::test]
async fn test_negative_graph_id_is_not_found() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/graph/-1/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Graph not found"}));

    let (status, _) = send(&app, "GET", "/api/graph/-7/adjacency_list", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "DELETE", "/api/graph/-1/node/A", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Graph not found"}));
}

#[tokio::test]
async fn test_delete_vertex() {
    let app = app();
    let id = create(&app, &["x", "y", "z"], &[("x", "y"), ("y", "z")]).await;

    let (status, body) = send(&app, "DELETE", &format!("/api/graph/{}/node/z", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = send(&app, "GET", &format!("/api/graph/{}/", id), None).await;
    assert_eq!(body["vertices"], json!([{"name": "x"}, {"name": "y"}]));
    assert_eq!(body["links"], json!([{"source": "x", "target": "y"}]));

    let (status, body) = send(&app, "DELETE", &format!("/api/graph/{}/node/z", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Vertex not found"}));
}

#[tokio::test]
async fn test_delete_from_missing_graph() {
    let app = app();
    let (status, _) = send(&app, "DELETE", "/api/graph/9999/node/x", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_last_vertex_removes_graph() {
    let app = app();
    let id = create(&app, &["solo"], &[]).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/graph/{}/node/solo", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/graph/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn test_persistent_backend_end_to_end() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let storage = PersistentStorage::open(temp_dir.path()).unwrap();
    let app = router(GraphService::new(Arc::new(storage)));

    let id = create(&app, &["A", "B", "C"], &[("A", "B"), ("A", "C")]).await;

    let (_, body) = send(&app, "GET", &format!("/api/graph/{}/adjacency_list", id), None).await;
    assert_eq!(body, json!({"adjacency": {"A": ["B", "C"], "B": [], "C": []}}));

    let (status, _) = send(&app, "DELETE", &format!("/api/graph/{}/node/A", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) =
        send(&app, "GET", &format!("/api/graph/{}/reverse_adjacency_list", id), None).await;
    assert_eq!(body, json!({"adjacency": {"B": [], "C": []}}));
}
