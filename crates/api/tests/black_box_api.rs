//! End-to-end tests against a live server on an ephemeral port.

use std::sync::Arc;

use serde_json::{Value, json};

use vitrine_api::app::services::CatalogService;
use vitrine_infra::{InMemoryCatalogStore, MemoryFileStore};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let service = Arc::new(CatalogService::new(
            Arc::new(InMemoryCatalogStore::new()),
            Arc::new(MemoryFileStore::new()),
        ));
        let app = vitrine_api::app::build_app(service);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_product(server: &TestServer, client: &reqwest::Client, body: Value) -> Value {
    let response = client
        .post(server.url("/products"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201, "create failed: {body}");
    response.json().await.unwrap()
}

#[tokio::test]
async fn create_then_fetch_by_slug() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let created = create_product(&server, &client, json!({ "name": "Jante Alu Sport" })).await;
    assert_eq!(created["slug"], "jante-alu-sport");
    assert_eq!(created["visible"], true);

    let fetched: Value = client
        .get(server.url("/products/jante-alu-sport"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "Jante Alu Sport");
    assert_eq!(fetched["id"], created["id"]);
}

#[tokio::test]
async fn unknown_slug_is_a_structured_404() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/products/introuvable"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn blank_name_is_rejected_with_400() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/products"))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn duplicate_names_receive_suffixed_slugs() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let a = create_product(&server, &client, json!({ "name": "Produit Test" })).await;
    let b = create_product(&server, &client, json!({ "name": "Produit Test" })).await;
    assert_eq!(a["slug"], "produit-test");
    assert_eq!(b["slug"], "produit-test-1");
}

#[tokio::test]
async fn listing_filters_and_pages() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    for i in 0..5 {
        create_product(&server, &client, json!({ "name": format!("Produit {i}") })).await;
    }
    create_product(
        &server,
        &client,
        json!({ "name": "Caché", "visible": false }),
    )
    .await;

    let page: Value = client
        .get(server.url("/products?visible=true&page=1&per_page=3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["meta"]["total"], 5);
    assert_eq!(page["meta"]["perPage"], 3);
    assert_eq!(page["data"].as_array().unwrap().len(), 3);

    let search: Value = client
        .get(server.url("/products?search=produit%202"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(search["meta"]["total"], 1);
    assert_eq!(search["data"][0]["name"], "Produit 2");
}

#[tokio::test]
async fn updates_are_visible_immediately_after_the_response() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let created = create_product(&server, &client, json!({ "name": "Avant" })).await;
    // Warm the read path.
    assert_eq!(
        client
            .get(server.url("/products/avant"))
            .send()
            .await
            .unwrap()
            .status(),
        200
    );

    let id = created["id"].as_str().unwrap();
    let response = client
        .put(server.url(&format!("/products/{id}")))
        .json(&json!({ "name": "Après" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(
        client
            .get(server.url("/products/apres"))
            .send()
            .await
            .unwrap()
            .status(),
        200
    );
    assert_eq!(
        client
            .get(server.url("/products/avant"))
            .send()
            .await
            .unwrap()
            .status(),
        404
    );
}

#[tokio::test]
async fn image_upload_sets_the_cover_and_sorts_it_first() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let created = create_product(&server, &client, json!({ "name": "Produit" })).await;
    let id = created["id"].as_str().unwrap();

    let first = client
        .post(server.url(&format!("/products/{id}/images?filename=a.webp")))
        .body("first".as_bytes().to_vec())
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second: Value = client
        .post(server.url(&format!("/products/{id}/images?filename=b.webp&cover=true")))
        .body("second".as_bytes().to_vec())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let images = second["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    // Cover-first ordering in the response.
    assert_eq!(images[0]["isCover"], true);
    assert!(images[0]["url"].as_str().unwrap().ends_with(".webp"));
    assert_eq!(images[1]["isCover"], false);
}

#[tokio::test]
async fn disallowed_upload_is_rejected() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let created = create_product(&server, &client, json!({ "name": "Produit" })).await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .post(server.url(&format!("/products/{id}/images?filename=script.sh")))
        .body("echo".as_bytes().to_vec())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn categories_round_trip_through_the_admin_api() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(server.url("/categories"))
        .json(&json!({ "name": "Éclairage" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["slug"], "eclairage");

    let listed: Value = client
        .get(server.url("/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "Éclairage");

    let id = created["id"].as_str().unwrap();
    let deleted = client
        .delete(server.url(&format!("/categories/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);
}

#[tokio::test]
async fn delete_product_returns_204_then_404() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let created = create_product(&server, &client, json!({ "name": "Éphémère" })).await;
    let id = created["id"].as_str().unwrap();

    let deleted = client
        .delete(server.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);

    let again = client
        .delete(server.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), 404);
}
