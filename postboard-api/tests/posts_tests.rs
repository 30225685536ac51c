/// Integration tests for the posts endpoints

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_listing_is_public_and_ordered() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [] }));

    let token = ctx.register("author@example.com").await;
    ctx.create_post(&token, "First", "One").await;
    ctx.create_post(&token, "Second", "Two").await;

    let (status, body) = ctx.send("GET", "/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["First", "Second"]);
}

#[tokio::test]
async fn test_create_requires_authentication() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/posts",
            None,
            Some(json!({ "title": "Hi", "content": "There" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthenticated.");

    let (_, body) = ctx.send("GET", "/posts", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_create_records_creator() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;
    let (_, me) = ctx.send("GET", "/me", Some(&token), None).await;

    let (status, body) = ctx
        .send(
            "POST",
            "/posts",
            Some(&token),
            Some(json!({ "title": "Hello", "content": "World" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Post created successfully");
    assert_eq!(body["data"]["title"], "Hello");
    assert_eq!(body["data"]["content"], "World");
    assert_eq!(body["data"]["user_id"], me["data"]["id"]);
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_create_validation() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;

    let (status, body) = ctx
        .send(
            "POST",
            "/posts",
            Some(&token),
            Some(json!({ "title": "t".repeat(256) })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["title"].is_array());
    assert_eq!(body["errors"]["content"][0], "The content field is required.");
}

#[tokio::test]
async fn test_show_existing_and_missing() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;
    let post = ctx.create_post(&token, "Title", "Body").await;
    let id = post["id"].as_i64().unwrap();

    let (status, body) = ctx.send("GET", &format!("/posts/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], post);

    for missing in ["/posts/9999", "/posts/not-a-number"] {
        let (status, body) = ctx.send("GET", missing, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{missing}");
        assert_eq!(body["message"], "Post not found");
    }
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;
    let post = ctx.create_post(&token, "Title", "Body").await;
    let uri = format!("/posts/{}", post["id"]);

    let (status, body) = ctx
        .send("PATCH", &uri, Some(&token), Some(json!({ "content": "Edited" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post updated successfully");
    assert_eq!(body["data"]["title"], "Title");
    assert_eq!(body["data"]["content"], "Edited");

    let (status, body) = ctx
        .send("PUT", &uri, Some(&token), Some(json!({ "title": "Renamed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["content"], "Edited");

    let (status, body) = ctx.send("PUT", &uri, Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Renamed");
}

#[tokio::test]
async fn test_update_rejects_empty_title() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;
    let post = ctx.create_post(&token, "Title", "Body").await;

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/posts/{}", post["id"]),
            Some(&token),
            Some(json!({ "title": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["title"].is_array());
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;

    let (status, body) = ctx
        .send("PUT", "/posts/42", Some(&token), Some(json!({ "title": "X" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn test_mutations_require_authentication() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;
    let post = ctx.create_post(&token, "Title", "Body").await;
    let uri = format!("/posts/{}", post["id"]);

    let (status, _) = ctx
        .send("PUT", &uri, None, Some(json!({ "title": "Hijacked" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx.send("DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = ctx.send("GET", &uri, None, None).await;
    assert_eq!(body["data"]["title"], "Title");
}

#[tokio::test]
async fn test_delete_then_show_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;
    let post = ctx.create_post(&token, "Title", "Body").await;
    let uri = format!("/posts/{}", post["id"]);

    let (status, body) = ctx.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Post deleted successfully" }));

    let (status, _) = ctx.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_user_may_edit_and_delete_any_post() {
    let ctx = TestContext::new();
    let author = ctx.register("author@example.com").await;
    let other = ctx.register("other@example.com").await;
    let post = ctx.create_post(&author, "Mine", "Body").await;
    let uri = format!("/posts/{}", post["id"]);

    let (status, body) = ctx
        .send("PATCH", &uri, Some(&other), Some(json!({ "title": "Theirs" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Theirs");
    assert_eq!(body["data"]["user_id"], post["user_id"]);

    let (status, _) = ctx.send("DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_rejects_blank_title_and_content() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;

    let (status, body) = ctx
        .send(
            "POST",
            "/posts",
            Some(&token),
            Some(json!({ "title": "  ", "content": "\t\n" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["title"][0], "The title field is required.");
    assert_eq!(body["errors"]["content"][0], "The content field is required.");

    let (_, body) = ctx.send("GET", "/posts", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_create_wrong_field_type_is_unprocessable() {
    let ctx = TestContext::new();
    let token = ctx.register("author@example.com").await;

    let (status, body) = ctx
        .send(
            "POST",
            "/posts",
            Some(&token),
            Some(json!({ "title": ["x"], "content": "Body" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["title"][0], "The title field must be a string.");
}
