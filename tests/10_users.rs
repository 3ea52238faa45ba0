mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn registered_user_can_read_own_profile() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register(server, &client, "profile").await?;

    let res = client
        .get(server.url(&format!("/users/{}", account.id)))
        .bearer_auth(&account.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["email"], account.email.as_str());
    assert_eq!(body["firstName"], "Test");
    assert!(body.get("password").is_none());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn duplicate_email_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register(server, &client, "dupe").await?;

    let res = client
        .post(server.url("/users/register"))
        .json(&json!({ "email": account.email, "firstName": "X", "lastName": "Y", "password": "pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert!(body["timestamp"].is_string());
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn login_returns_working_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register(server, &client, "login").await?;

    let res = client
        .post(server.url("/users/login"))
        .json(&json!({ "email": account.email, "password": "pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let token = body["token"].as_str().unwrap_or_default().to_string();

    let res = client
        .get(server.url(&format!("/users/{}", account.id)))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/users/login"))
        .json(&json!({ "email": account.email, "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn subscriptions_drive_the_feed() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let reader = common::register(server, &client, "reader").await?;
    let writer = common::register(server, &client, "writer").await?;

    let res = client
        .post(server.url("/posts"))
        .bearer_auth(&writer.token)
        .json(&json!({ "content": "hello followers" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let post: Value = res.json().await?;

    let res = client
        .post(server.url(&format!("/users/{}/subscriptions", writer.id)))
        .bearer_auth(&reader.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let feed: Value = client
        .get(server.url("/users/feed"))
        .bearer_auth(&reader.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(feed[0]["id"], post["id"]);
    Ok(())
}
