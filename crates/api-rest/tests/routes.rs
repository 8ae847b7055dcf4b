use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use quill_core::CoreConfig;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let cfg = CoreConfig::new(Duration::ZERO, "https://blog.example.com", None)
        .expect("CoreConfig::new should succeed");
    let state = api_rest::build_state(cfg).expect("state should build");
    api_rest::router(state)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("request should complete");
    let status = res.status();
    let bytes = res
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn sign_up(app: &Router, email: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/auth/sign-up",
            json!({ "email": email, "password": "secret123", "display_name": name }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().expect("token").to_string()
}

fn article_ids(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn categories_list_starts_with_all() {
    let (status, body) = send(&app(), get("/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["categories"],
        json!(["All", "Technology", "Design", "Business", "Lifestyle", "Travel"])
    );
}

#[tokio::test]
async fn design_deep_link_shows_only_design() {
    let (status, body) = send(&app(), get("/feed?category=Design")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_category"], "Design");
    assert_eq!(body["heading"], "Design");
    assert!(body["featured"].is_null());
    assert_eq!(article_ids(&body["articles"]), ["2"]);
    assert_eq!(body["location"], "/feed?category=Design");

    let selected: Vec<&Value> = body["filters"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|f| f["selected"] == true)
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["label"], "Design");
}

#[tokio::test]
async fn unknown_category_falls_back_to_all() {
    let (status, body) = send(&app(), get("/feed?category=Cooking")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_category"], "All");
    assert_eq!(body["heading"], "Latest Articles");
    assert_eq!(body["featured"]["id"], "1");
    assert_eq!(article_ids(&body["articles"]), ["2", "3", "4", "5", "6"]);
}

#[tokio::test]
async fn selecting_all_clears_the_parameter_and_restores_featured() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json(
            "/feed/selection",
            json!({ "current_query": "category=Design", "category": "All" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_category"], "All");
    assert!(body["query"].is_null());
    assert_eq!(body["location"], "/feed");

    let (_, feed) = send(&app, get(body["location"].as_str().unwrap())).await;
    assert_eq!(feed["featured"]["id"], "1");
    assert_eq!(feed["articles"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn selecting_a_category_sets_the_parameter() {
    let (_, body) = send(
        &app(),
        post_json("/feed/selection", json!({ "category": "Travel" }), None),
    )
    .await;
    assert_eq!(body["selected_category"], "Travel");
    assert_eq!(body["query"], "category=Travel");
    assert_eq!(body["location"], "/feed?category=Travel");
}

#[tokio::test]
async fn selection_writes_back_unrelated_parameters_verbatim() {
    let (status, body) = send(
        &app(),
        post_json(
            "/feed/selection",
            json!({ "current_query": "ref=%FF&category=Design", "category": "All" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "ref=%FF");
    assert_eq!(body["location"], "/feed?ref=%FF");
}

#[tokio::test]
async fn article_detail_and_not_found() {
    let app = app();
    let (status, body) = send(&app, get("/articles/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["article"]["title"], "The Future of Web Development: Trends to Watch in 2025");
    assert_eq!(body["comments"]["count"], 2);
    assert_eq!(article_ids(&body["related"]), ["6"]);
    assert_eq!(body["share"]["page_url"], "https://blog.example.com/articles/1");

    let (status, body) = send(&app, get("/articles/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Article Not Found");
    assert_eq!(body["redirect"], "/feed");
}

#[tokio::test]
async fn anonymous_comment_is_rejected_with_redirect() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json("/articles/1/comments", json!({ "content": "Hi" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["redirect"], "/auth");

    let (_, comments) = send(&app, get("/articles/1/comments")).await;
    assert_eq!(comments["count"], 2);
}

#[tokio::test]
async fn signed_in_comment_is_prepended() {
    let app = app();
    let token = sign_up(&app, "ada@example.com", "Ada").await;

    let (status, body) = send(
        &app,
        post_json(
            "/articles/1/comments",
            json!({ "content": "  Brilliant piece.  " }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["comment"]["author"], "Ada");
    assert_eq!(body["comment"]["content"], "Brilliant piece.");

    let (_, comments) = send(&app, get("/articles/1/comments")).await;
    assert_eq!(comments["count"], 3);
    assert_eq!(comments["comments"][0]["id"], body["comment"]["id"]);
}

#[tokio::test]
async fn whitespace_comment_is_rejected() {
    let app = app();
    let token = sign_up(&app, "ada@example.com", "Ada").await;

    let (status, body) = send(
        &app,
        post_json("/articles/2/comments", json!({ "content": "   " }), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please write a comment");

    let (_, comments) = send(&app, get("/articles/2/comments")).await;
    assert_eq!(comments["count"], 1);
}

#[tokio::test]
async fn auth_errors_are_user_visible() {
    let app = app();
    sign_up(&app, "ada@example.com", "Ada").await;

    let (status, body) = send(
        &app,
        post_json(
            "/auth/sign-up",
            json!({ "email": "ada@example.com", "password": "secret123", "display_name": "Ada" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "This email is already registered. Try logging in instead."
    );

    let (status, body) = send(
        &app,
        post_json(
            "/auth/sign-in",
            json!({ "email": "ada@example.com", "password": "not-it-at-all" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password. Please try again.");

    let (status, body) = send(
        &app,
        post_json("/auth/sign-in", json!({ "email": "", "password": "x" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["email"], "Please enter a valid email address");
    assert_eq!(
        body["fields"]["password"],
        "Password must be at least 6 characters"
    );
}

#[tokio::test]
async fn sign_in_and_sign_out_round_trip() {
    let app = app();
    sign_up(&app, "ada@example.com", "Ada").await;

    let (status, body) = send(
        &app,
        post_json(
            "/auth/sign-in",
            json!({ "email": "ada@example.com", "password": "secret123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["display_name"], "Ada");
    assert_eq!(body["redirect"], "/feed");
    let token = body["token"].as_str().unwrap().to_string();

    let session_req = |token: &str| {
        Request::builder()
            .uri("/auth/session")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };
    let (_, session) = send(&app, session_req(&token)).await;
    assert_eq!(session["authenticated"], true);

    let (status, _) = send(&app, post_json("/auth/sign-out", json!({}), Some(&token))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, session) = send(&app, session_req(&token)).await;
    assert_eq!(session["authenticated"], false);
}

#[tokio::test]
async fn newsletter_validates_email() {
    let app = app();
    let (status, body) = send(
        &app,
        post_json("/newsletter", json!({ "email": "nope" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please enter a valid email address");

    let (status, body) = send(
        &app,
        post_json("/newsletter", json!({ "email": "reader@example.com" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Thank you for subscribing!");
    assert_eq!(body["already_subscribed"], false);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(&app(), get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/feed"].is_object());
    assert!(body["paths"]["/articles/{id}/comments"].is_object());
}
