use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};
use service::lines::LineStore;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated temp store file per test run
    let lines_path = format!("target/test-data/{}/lines.json", Uuid::new_v4());
    let lines: Arc<LineStore> = LineStore::new(lines_path).await?;

    let state = ServerState { lines };
    let app: Router = routes::build_router(CorsLayer::very_permissive(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn line_params(name: &str, color: &str) -> serde_json::Value {
    json!({"name": name, "color": color, "upStationId": 1, "downStationId": 2, "distance": 10})
}

async fn create_line(
    c: &reqwest::Client,
    base_url: &str,
    name: &str,
    color: &str,
) -> anyhow::Result<i64> {
    let res = c
        .post(format!("{}/lines", base_url))
        .json(&line_params(name, color))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    Ok(body["id"].as_i64().expect("id in create response"))
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_line_returns_created_with_body() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/lines", app.base_url))
        .json(&line_params("LineA", "bg-red-600"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "LineA");
    assert_eq!(body["color"], "bg-red-600");
    assert!(body["id"].is_i64());
    // station/distance fields are not part of the response contract
    assert!(body.get("upStationId").is_none());
    assert!(body.get("distance").is_none());
    Ok(())
}

#[tokio::test]
async fn create_line_without_station_fields_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/lines", app.base_url))
        .json(&json!({"name": "LineA", "color": "bg-red-600"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn create_duplicate_name_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;

    let res = c
        .post(format!("{}/lines", app.base_url))
        .json(&line_params("LineA", "bg-green-600"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Conflict");
    Ok(())
}

#[tokio::test]
async fn create_with_empty_name_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/lines", app.base_url))
        .json(&line_params(" ", "bg-red-600"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_contains_created_lines_in_order() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let id_a = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;
    let id_b = create_line(&c, &app.base_url, "LineB", "bg-green-600").await?;

    let res = c.get(format!("{}/lines", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let ids: Vec<i64> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|l| l["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![id_a, id_b]);
    Ok(())
}

#[tokio::test]
async fn list_empty_is_valid() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/lines", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn get_line_returns_name_and_color() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let id = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;

    let res = c.get(format!("{}/lines/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "LineA");
    assert_eq!(body["color"], "bg-red-600");
    Ok(())
}

#[tokio::test]
async fn get_unknown_line_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/lines/999", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_line_and_get_reflects_changes() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let id = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;

    let res = c
        .put(format!("{}/lines/{}", app.base_url, id))
        .json(&json!({"name": "LineB", "color": "bg-blue-600"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/lines/{}", app.base_url, id)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "LineB");
    assert_eq!(body["color"], "bg-blue-600");
    Ok(())
}

#[tokio::test]
async fn update_unknown_line_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .put(format!("{}/lines/999", app.base_url))
        .json(&json!({"name": "LineB", "color": "bg-blue-600"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn rename_to_existing_name_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;
    let id_b = create_line(&c, &app.base_url, "LineB", "bg-green-600").await?;

    let res = c
        .put(format!("{}/lines/{}", app.base_url, id_b))
        .json(&json!({"name": "LineA", "color": "bg-green-600"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn update_keeping_own_name_ok() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let id = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;

    // same name, new color: not a conflict with itself
    let res = c
        .put(format!("{}/lines/{}", app.base_url, id))
        .json(&json!({"name": "LineA", "color": "bg-blue-600"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn delete_line_then_get_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let id = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;

    let res = c.delete(format!("{}/lines/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = c.get(format!("{}/lines/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_unknown_line_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().delete(format!("{}/lines/999", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn full_line_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let id = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;

    // duplicate create conflicts
    let res = c
        .post(format!("{}/lines", app.base_url))
        .json(&line_params("LineA", "bg-red-600"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    // get reflects creation
    let res = c.get(format!("{}/lines/{}", app.base_url, id)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "LineA");
    assert_eq!(body["color"], "bg-red-600");

    // update then get reflects new values
    let res = c
        .put(format!("{}/lines/{}", app.base_url, id))
        .json(&json!({"name": "LineB", "color": "bg-blue-600"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/lines/{}", app.base_url, id)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "LineB");

    // delete then get 404
    let res = c.delete(format!("{}/lines/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/lines/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // freed name is reusable, freed id is not
    let new_id = create_line(&c, &app.base_url, "LineA", "bg-red-600").await?;
    assert_ne!(new_id, id);
    Ok(())
}
