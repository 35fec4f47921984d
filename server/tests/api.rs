use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use todo_server::{app, app_seeded, Todo};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn data_todo(json: &serde_json::Value) -> Todo {
    serde_json::from_value(json["data"].clone()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty_envelope() {
    let resp = app().oneshot(get_request("/api/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["total"], 0);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_seeded_is_sorted_with_total() {
    let resp = app_seeded().oneshot(get_request("/api/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["total"], 2);
    let items = json["data"].as_array().unwrap();
    assert_eq!(items[0]["order"], 0);
    assert_eq!(items[1]["order"], 1);
}

#[tokio::test]
async fn list_filters_split_by_completion() {
    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"active one"}"#))
        .await
        .unwrap();
    let active_id = data_todo(&body_json(resp).await).id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"done one"}"#))
        .await
        .unwrap();
    let done_id = data_todo(&body_json(resp).await).id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/todos/{done_id}"),
            r#"{"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos?filter=active"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["id"], active_id.to_string());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos?filter=completed"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["id"], done_id.to_string());

    // Unrecognized filters behave as "all".
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos?filter=bogus"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["total"], 2);
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201_with_envelope() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", r#"{"text":"  Buy milk  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Todo created successfully");
    assert_eq!(json["data"]["text"], "Buy milk");
    assert_eq!(json["data"]["completed"], false);
    assert_eq!(json["data"]["order"], 0);
    assert!(json["data"].get("createdAt").is_some());
    assert!(json["data"].get("updatedAt").is_none());
}

#[tokio::test]
async fn create_assigns_the_next_order() {
    let mut app = app_seeded().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"third"}"#))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["data"]["order"], 2);
}

#[tokio::test]
async fn create_rejects_blank_text_without_adding() {
    let mut app = app().into_service();

    for body in [r#"{"text":"   "}"#, "{}"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/api/todos", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Todo text is required");
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["total"], 0);
}

#[tokio::test]
async fn create_malformed_json_is_a_validation_error() {
    let resp = app()
        .oneshot(json_request("POST", "/api/todos", "not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
}

// --- get ---

#[tokio::test]
async fn get_todo_not_found() {
    let resp = app()
        .oneshot(get_request(
            "/api/todos/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Todo not found");
}

#[tokio::test]
async fn get_todo_with_garbage_id_is_not_found() {
    // A segment that is not a UUID names no item; same 404 as unknown ids.
    let resp = app().oneshot(get_request("/api/todos/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Todo not found");
}

#[tokio::test]
async fn create_then_get_round_trips_all_fields() {
    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"round trip"}"#))
        .await
        .unwrap();
    let created = body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/api/todos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched["data"], created["data"]);
    assert!(fetched["data"].get("updatedAt").is_none());
}

// --- update ---

#[tokio::test]
async fn update_applies_partial_fields_and_stamps_updated_at() {
    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"Walk dog"}"#))
        .await
        .unwrap();
    let id = data_todo(&body_json(resp).await).id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/todos/{id}"),
            r#"{"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Todo updated successfully");
    assert_eq!(json["data"]["text"], "Walk dog");
    assert_eq!(json["data"]["completed"], true);
    assert!(json["data"].get("updatedAt").is_some());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/todos/{id}"),
            r#"{"text":"Walk cat"}"#,
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["text"], "Walk cat");
    assert_eq!(json["data"]["completed"], true);
}

#[tokio::test]
async fn update_todo_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/todos/00000000-0000-0000-0000-000000000000",
            r#"{"text":"Nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "Todo not found");
}

// --- delete ---

#[tokio::test]
async fn delete_returns_the_item_once() {
    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"doomed"}"#))
        .await
        .unwrap();
    let id = data_todo(&body_json(resp).await).id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", &format!("/api/todos/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Todo deleted successfully");
    assert_eq!(json["data"]["text"], "doomed");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", &format!("/api/todos/{id}"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["total"], 0);
}

// --- clear completed ---

#[tokio::test]
async fn clear_completed_removes_all_and_only_completed() {
    let mut app = app().into_service();

    let mut completed_ids = Vec::new();
    for (text, completed) in [("keep", false), ("done", true), ("also done", true)] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/api/todos",
                &format!(r#"{{"text":"{text}"}}"#),
            ))
            .await
            .unwrap();
        let id = data_todo(&body_json(resp).await).id;
        if completed {
            let resp = ServiceExt::ready(&mut app)
                .await
                .unwrap()
                .call(json_request(
                    "PUT",
                    &format!("/api/todos/{id}"),
                    r#"{"completed":true}"#,
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            completed_ids.push(id);
        }
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", "/api/todos/completed/clear", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "2 completed todos cleared");
    let removed = json["data"].as_array().unwrap();
    assert_eq!(removed.len(), 2);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["text"], "keep");

    // Idempotent when nothing is completed.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", "/api/todos/completed/clear", ""))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["message"], "0 completed todos cleared");
    assert!(json["data"].as_array().unwrap().is_empty());
}

// --- reorder ---

#[tokio::test]
async fn reorder_full_reversal_reverses_the_list() {
    let mut app = app().into_service();

    let mut ids = Vec::new();
    for text in ["a", "b", "c"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/api/todos",
                &format!(r#"{{"text":"{text}"}}"#),
            ))
            .await
            .unwrap();
        ids.push(data_todo(&body_json(resp).await).id);
    }

    ids.reverse();
    let body = serde_json::json!({ "todoIds": ids }).to_string();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/api/todos/reorder", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "Todos reordered successfully");
    let texts: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["c", "b", "a"]);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/todos"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["text"], "c");
    assert_eq!(json["data"][2]["text"], "a");
}

#[tokio::test]
async fn reorder_requires_an_array() {
    for body in [r#"{"todoIds":"nope"}"#, "{}"] {
        let resp = app()
            .oneshot(json_request("PUT", "/api/todos/reorder", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "todoIds must be an array");
    }
}

#[tokio::test]
async fn reorder_skips_unknown_entries_but_burns_their_positions() {
    let mut app = app().into_service();

    let mut ids = Vec::new();
    for text in ["a", "b"] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/api/todos",
                &format!(r#"{{"text":"{text}"}}"#),
            ))
            .await
            .unwrap();
        ids.push(data_todo(&body_json(resp).await).id);
    }

    // Position 0 goes to an id that matches nothing; "garbage" is not even
    // a UUID. Both still consume their index.
    let body = serde_json::json!({
        "todoIds": [
            "11111111-1111-1111-1111-111111111111",
            ids[1],
            "garbage",
            ids[0],
        ]
    })
    .to_string();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/api/todos/reorder", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["text"], "b");
    assert_eq!(json["data"][0]["order"], 1);
    assert_eq!(json["data"][1]["text"], "a");
    assert_eq!(json["data"][1]["order"], 3);
}

// --- stats ---

#[tokio::test]
async fn stats_follow_the_seeded_lifecycle() {
    let mut app = app_seeded().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/todos", r#"{"text":"X"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = data_todo(&body_json(resp).await);
    assert_eq!(created.order, 2);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/todos/{}", created.id),
            r#"{"completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/stats"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(
        json["data"],
        serde_json::json!({"total": 3, "active": 2, "completed": 1, "completionRate": 33})
    );

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", "/api/todos/completed/clear", ""))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["message"], "1 completed todos cleared");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/stats"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(
        json["data"],
        serde_json::json!({"total": 2, "active": 2, "completed": 0, "completionRate": 0})
    );
}

// --- health and fallback ---

#[tokio::test]
async fn health_is_flat_not_enveloped() {
    let resp = app().oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Todo API is running!");
    assert!(json.get("timestamp").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn unknown_routes_get_the_fallback_envelope() {
    for uri in ["/api/nope", "/nope", "/api/todos/nope/nope"] {
        let resp = app().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "API endpoint not found");
    }
}
