use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

use common::{create_test_app, request_json};

fn word_payload(word: &str) -> serde_json::Value {
    json!({
        "word": word,
        "phonetic": "/tɛst/",
        "meaning": "a trial",
        "partOfSpeech": "noun",
        "difficulty": "easy",
        "category": "general"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = create_test_app().await;
    let (status, body) = request_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");

    let (status, _) = request_json(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_returns_not_found() {
    let app = create_test_app().await;
    let (status, body) = request_json(&app, Method::GET, "/nonexistent/path", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn word_crud_lifecycle() {
    let app = create_test_app().await;

    let (status, body) =
        request_json(&app, Method::POST, "/api/words", Some(word_payload("apple"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["word"], "apple");
    assert_eq!(body["data"]["difficulty"], "easy");
    assert_eq!(body["data"]["reviewCount"], 0);
    assert!(body["data"]["lastReviewed"].is_null());
    let id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/words/{id}");
    let (status, body) = request_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meaning"], "a trial");

    let mut updated = word_payload("apple");
    updated["meaning"] = json!("a fruit");
    updated["difficulty"] = json!("hard");
    let (status, body) = request_json(&app, Method::PUT, &uri, Some(updated)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meaning"], "a fruit");
    assert_eq!(body["data"]["difficulty"], "hard");

    let (status, body) = request_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = request_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn word_create_rejects_missing_fields() {
    let app = create_test_app().await;

    let (status, body) =
        request_json(&app, Method::POST, "/api/words", Some(json!({"word": "solo"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/words",
        Some(json!({"word": "bad", "meaning": "x", "difficulty": "impossible"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn word_list_filters_by_search_and_difficulty() {
    let app = create_test_app().await;

    request_json(&app, Method::POST, "/api/words", Some(word_payload("apple"))).await;
    let mut hard = word_payload("banana");
    hard["difficulty"] = json!("hard");
    request_json(&app, Method::POST, "/api/words", Some(hard)).await;

    let (status, body) = request_json(&app, Method::GET, "/api/words", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = request_json(&app, Method::GET, "/api/words?search=APP", None).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["word"], "apple");

    let (_, body) = request_json(&app, Method::GET, "/api/words?difficulty=hard", None).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["word"], "banana");

    let (status, body) = request_json(&app, Method::GET, "/api/words?difficulty=weird", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn word_review_increments_and_writes_log() {
    let app = create_test_app().await;

    let (_, body) =
        request_json(&app, Method::POST, "/api/words", Some(word_payload("echo"))).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/words/{id}/review");

    let (status, body) = request_json(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reviewCount"], 1);

    let (_, body) = request_json(&app, Method::POST, &uri, None).await;
    assert_eq!(body["data"]["reviewCount"], 2);

    let (_, body) = request_json(&app, Method::GET, "/api/study-logs", None).await;
    let logs = body["data"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["logType"], "word");
    assert_eq!(logs[0]["referenceId"], id);
    assert_eq!(logs[0]["action"], "Reviewed word");

    let (status, body) = request_json(&app, Method::POST, "/api/words/9999/review", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn word_toggle_favorite_flips_flag() {
    let app = create_test_app().await;

    let (_, body) =
        request_json(&app, Method::POST, "/api/words", Some(word_payload("star"))).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/words/{id}/toggle-favorite");

    let (status, body) = request_json(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isFavorite"], true);

    // The flip must be durable before the response: a follow-up read on
    // another pool connection has to see it.
    let (_, body) = request_json(&app, Method::GET, &format!("/api/words/{id}"), None).await;
    assert_eq!(body["data"]["isFavorite"], true);

    let (_, body) = request_json(&app, Method::POST, &uri, None).await;
    assert_eq!(body["data"]["isFavorite"], false);

    let (_, body) = request_json(&app, Method::GET, &format!("/api/words/{id}"), None).await;
    assert_eq!(body["data"]["isFavorite"], false);

    request_json(&app, Method::POST, &uri, None).await;
    let (_, body) = request_json(&app, Method::GET, "/api/words?isFavorite=true", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn word_bulk_delete_reports_count() {
    let app = create_test_app().await;

    let mut ids = Vec::new();
    for word in ["one", "two", "three"] {
        let (_, body) =
            request_json(&app, Method::POST, "/api/words", Some(word_payload(word))).await;
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/words/bulk-delete",
        Some(json!({"ids": [ids[0], ids[1], 9999]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 2);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/words/bulk-delete",
        Some(json!({"ids": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn word_random_and_categories() {
    let app = create_test_app().await;

    for word in ["cat", "dog"] {
        let mut payload = word_payload(word);
        payload["category"] = json!("animals");
        request_json(&app, Method::POST, "/api/words", Some(payload)).await;
    }
    let mut payload = word_payload("uncategorized");
    payload["category"] = json!("");
    request_json(&app, Method::POST, "/api/words", Some(payload)).await;

    let (status, body) = request_json(&app, Method::GET, "/api/words/random?count=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = request_json(&app, Method::GET, "/api/words/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(["animals"]));
}

#[tokio::test]
async fn sentence_defaults_and_types() {
    let app = create_test_app().await;

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "How are you?", "chinese": "你好吗？"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sentenceType"], "daily");

    let (status, body) = request_json(&app, Method::GET, "/api/sentences/types", None).await;
    assert_eq!(status, StatusCode::OK);
    let types = body["data"].as_array().unwrap();
    assert_eq!(types.len(), 6);
    assert_eq!(types[0]["value"], "translation");
    assert_eq!(types[0]["label"], "Translation practice");

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "x", "chinese": "y", "sentenceType": "poem"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn sentence_list_filters_by_type() {
    let app = create_test_app().await;

    request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "Q2 results", "chinese": "二季度业绩", "sentenceType": "business"})),
    )
    .await;
    request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "Good morning", "chinese": "早上好"})),
    )
    .await;

    let (_, body) = request_json(&app, Method::GET, "/api/sentences?type=business", None).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["english"], "Q2 results");
}

#[tokio::test]
async fn grammar_lifecycle_and_toggle_mastered() {
    let app = create_test_app().await;

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/grammar",
        Some(json!({
            "title": "Present perfect",
            "structure": "have/has + past participle",
            "explanation": "Connects past actions to the present.",
            "examples": ["I have seen it.", "She has left."],
            "category": "tenses"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["difficulty"], "intermediate");
    assert_eq!(body["data"]["examples"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["isMastered"], false);
    let id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/grammar/{id}/toggle-mastered");
    let (status, body) = request_json(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isMastered"], true);

    let (_, body) = request_json(&app, Method::GET, "/api/grammar?isMastered=true", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/grammar/{id}/review");
    let (_, body) = request_json(&app, Method::POST, &uri, None).await;
    assert_eq!(body["data"]["reviewCount"], 1);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/grammar",
        Some(json!({"title": "t", "structure": "s", "explanation": "e", "difficulty": "expert"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn study_goal_progress_is_derived() {
    let app = create_test_app().await;

    let today = chrono::Utc::now().date_naive();
    let start = today - chrono::Duration::days(5);
    let end = today + chrono::Duration::days(5);
    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/study-goals",
        Some(json!({
            "title": "August push",
            "targetWords": 100,
            "startDate": start.format("%Y-%m-%d").to_string(),
            "endDate": end.format("%Y-%m-%d").to_string()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], true);
    assert_eq!(body["data"]["progress"], 50.0);
    let id = body["data"]["id"].as_i64().unwrap();

    let mut inactive = body["data"].clone();
    inactive["isActive"] = json!(false);
    let uri = format!("/api/study-goals/{id}");
    let (status, body) = request_json(&app, Method::PUT, &uri, Some(inactive)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["progress"].is_null());

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/study-goals",
        Some(json!({
            "title": "Backwards",
            "startDate": "2026-08-10",
            "endDate": "2026-08-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn dashboard_reflects_activity() {
    let app = create_test_app().await;

    let (_, body) =
        request_json(&app, Method::POST, "/api/words", Some(word_payload("delta"))).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/words/{id}/review");
    request_json(&app, Method::POST, &uri, None).await;

    let (status, body) = request_json(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalWords"], 1);
    assert_eq!(data["todayWords"], 1);
    assert_eq!(data["totalSentences"], 0);
    assert_eq!(data["studyStreak"], 1);
    let activities = data["recentActivities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["type"], "word");
}

#[tokio::test]
async fn stats_report_covers_seven_days() {
    let app = create_test_app().await;

    request_json(&app, Method::POST, "/api/words", Some(word_payload("alpha"))).await;

    let (status, body) = request_json(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["last7Days"].as_array().unwrap().len(), 7);
    assert_eq!(data["last7Days"][6]["words"], 1);
    let buckets = data["wordByDifficulty"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["key"], "easy");
    assert_eq!(buckets[0]["count"], 1);

    let bucket_total: i64 = buckets.iter().map(|b| b["count"].as_i64().unwrap()).sum();
    let (_, body) = request_json(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(body["data"]["totalWords"], bucket_total);
}

#[tokio::test]
async fn review_queue_surfaces_unreviewed_items() {
    let app = create_test_app().await;

    request_json(&app, Method::POST, "/api/words", Some(word_payload("fresh"))).await;
    request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "New sentence", "chinese": "新句子"})),
    )
    .await;

    let (status, body) = request_json(&app, Method::GET, "/api/review", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|i| i["type"] == "word"));
    assert!(items.iter().any(|i| i["type"] == "sentence"));
    assert!(items.iter().all(|i| i["lastReviewed"].is_null()));
}

#[tokio::test]
async fn search_caps_each_category_at_ten() {
    let app = create_test_app().await;

    for i in 0..12 {
        request_json(
            &app,
            Method::POST,
            "/api/words",
            Some(word_payload(&format!("zebra{i}"))),
        )
        .await;
    }

    let (status, body) = request_json(&app, Method::GET, "/api/search?q=zebra", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["words"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn review_queue_applies_per_type_and_merged_caps() {
    let app = create_test_app().await;

    for i in 0..25 {
        request_json(
            &app,
            Method::POST,
            "/api/words",
            Some(word_payload(&format!("w{i}"))),
        )
        .await;
        request_json(
            &app,
            Method::POST,
            "/api/sentences",
            Some(json!({"english": format!("sentence {i}"), "chinese": "句子"})),
        )
        .await;
        request_json(
            &app,
            Method::POST,
            "/api/grammar",
            Some(json!({
                "title": format!("rule {i}"),
                "structure": "s",
                "explanation": "e"
            })),
        )
        .await;
    }

    let (status, body) = request_json(&app, Method::GET, "/api/review", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 50);
    for kind in ["word", "sentence", "grammar"] {
        assert!(items.iter().filter(|i| i["type"] == kind).count() <= 20);
    }
}

#[tokio::test]
async fn search_spans_all_entities() {
    let app = create_test_app().await;

    let mut payload = word_payload("perfect");
    payload["meaning"] = json!("flawless");
    request_json(&app, Method::POST, "/api/words", Some(payload)).await;
    request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "Practice makes perfect", "chinese": "熟能生巧"})),
    )
    .await;
    request_json(
        &app,
        Method::POST,
        "/api/grammar",
        Some(json!({
            "title": "Present perfect",
            "structure": "have + past participle",
            "explanation": "Past with present relevance."
        })),
    )
    .await;

    let (status, body) = request_json(&app, Method::GET, "/api/search?q=perfect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["words"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["sentences"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["grammar"].as_array().unwrap().len(), 1);

    let (status, body) = request_json(&app, Method::GET, "/api/search?q=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["words"].as_array().unwrap().is_empty());
    assert!(body["data"]["sentences"].as_array().unwrap().is_empty());
    assert!(body["data"]["grammar"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn study_logs_filter_by_type() {
    let app = create_test_app().await;

    let (_, body) =
        request_json(&app, Method::POST, "/api/words", Some(word_payload("logme"))).await;
    let word_id = body["data"]["id"].as_i64().unwrap();
    request_json(
        &app,
        Method::POST,
        &format!("/api/words/{word_id}/review"),
        None,
    )
    .await;

    let (_, body) = request_json(
        &app,
        Method::POST,
        "/api/sentences",
        Some(json!({"english": "Log this", "chinese": "记录"})),
    )
    .await;
    let sentence_id = body["data"]["id"].as_i64().unwrap();
    request_json(
        &app,
        Method::POST,
        &format!("/api/sentences/{sentence_id}/review"),
        None,
    )
    .await;

    let (_, body) = request_json(&app, Method::GET, "/api/study-logs", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = request_json(&app, Method::GET, "/api/study-logs?type=sentence", None).await;
    let logs = body["data"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["logType"], "sentence");

    let (status, body) = request_json(&app, Method::GET, "/api/study-logs?type=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let log_id = logs[0]["id"].as_i64().unwrap();
    let (status, body) =
        request_json(&app, Method::GET, &format!("/api/study-logs/{log_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["referenceId"], sentence_id);
}
