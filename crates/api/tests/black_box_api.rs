use cannareg_api::app::{build_app, services};
use cannareg_products::ValidationMode;
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(mode: ValidationMode) -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(services::in_memory_registry(mode), None);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn product_body(thc: Value, category: &str, status: Option<&str>) -> Value {
    let mut body = json!({
        "name": "Full Spectrum Oil",
        "spectrum_type": "sativa",
        "thc_percent": thc,
        "cbd_percent": 15.0,
        "therapeutic_category": category,
    });
    if let Some(status) = status {
        body["regulatory_status"] = json!(status);
    }
    body
}

async fn create(client: &reqwest::Client, srv: &TestServer, body: &Value) -> reqwest::Response {
    client
        .post(srv.url("/api/products"))
        .json(body)
        .send()
        .await
        .unwrap()
}

async fn create_ok(client: &reqwest::Client, srv: &TestServer, body: &Value) -> Value {
    let res = create(client, srv, body).await;
    if res.status() != StatusCode::CREATED {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 201 Created, got {status} body={body}");
    }
    res.json().await.unwrap()
}

async fn list(client: &reqwest::Client, srv: &TestServer, path: &str) -> Vec<Value> {
    let res = client.get(srv.url(path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_reports_store_and_count() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "in_memory");
    assert_eq!(body["products"], 0);
}

#[tokio::test]
async fn low_thc_approved_product_is_created_without_risk() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let body = product_body(json!(0.1), "neurology", Some("approved"));
    let created = create_ok(&client, &srv, &body).await;

    assert_eq!(created["thc_percent"], "0.10");
    assert_eq!(created["cbd_percent"], "15.00");
    assert_eq!(created["regulatory_status"], "approved");
    assert_eq!(created["regulatory_status_label"], "Approved");
    assert_eq!(created["spectrum_type_label"], "Sativa");
    assert_eq!(created["therapeutic_category_label"], "Neurology");
    assert_eq!(created["has_risk"], false);
    assert!(created["risk_explanation"].is_null());
    assert_eq!(created["created_at"], created["updated_at"]);
}

#[tokio::test]
async fn high_thc_neurology_product_is_flagged() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let body = product_body(json!("0.8"), "neurology", Some("pending"));
    let created = create_ok(&client, &srv, &body).await;

    assert_eq!(created["has_risk"], true);
    let explanation = created["risk_explanation"].as_str().unwrap();
    assert!(explanation.contains("0.80"));
    assert!(explanation.contains("Neurology"));
}

#[tokio::test]
async fn approving_high_thc_product_is_rejected() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let body = product_body(json!(0.5), "pediatrics", Some("approved"));
    let res = create(&client, &srv, &body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "thc_exceeds_limit_for_approval");
    assert!(body["message"].as_str().unwrap().contains("0.30%"));

    // Nothing was stored.
    assert!(list(&client, &srv, "/api/products").await.is_empty());
}

#[tokio::test]
async fn threshold_is_exclusive_and_category_matters() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let body = product_body(json!(0.3), "neurology", Some("approved"));
    let boundary = create_ok(&client, &srv, &body).await;
    assert_eq!(boundary["has_risk"], false);

    let body = product_body(json!(0.6), "dermatology", Some("pending"));
    let dermatology = create_ok(&client, &srv, &body).await;
    assert_eq!(dermatology["has_risk"], false);
}

#[tokio::test]
async fn status_defaults_to_pending() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let created = create_ok(&client, &srv, &product_body(json!(0.9), "oncology", None)).await;
    assert_eq!(created["regulatory_status"], "pending");
}

#[tokio::test]
async fn name_is_stored_trimmed() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let mut body = product_body(json!(0.1), "oncology", None);
    body["name"] = json!("  Oil  ");
    let created = create_ok(&client, &srv, &body).await;
    assert_eq!(created["name"], "Oil");

    let searched = list(&client, &srv, "/api/products?search=oil").await;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0]["name"], "Oil");
}

#[tokio::test]
async fn field_validation_errors_are_bad_requests() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let mut negative = product_body(json!(0.1), "other", None);
    negative["cbd_percent"] = json!(-1);
    let res = create(&client, &srv, &negative).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let unknown_category = product_body(json!(0.1), "cardiology", None);
    let res = create(&client, &srv, &unknown_category).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn at_risk_listing_and_filters() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let risky = create_ok(&client, &srv, &product_body(json!(0.8), "neurology", None)).await;
    create_ok(&client, &srv, &product_body(json!(0.6), "dermatology", None)).await;
    create_ok(&client, &srv, &product_body(json!(0.1), "pediatrics", Some("approved"))).await;

    let flagged = list(&client, &srv, "/api/products/at-risk").await;
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0]["id"], risky["id"]);

    let all = list(&client, &srv, "/api/products").await;
    assert_eq!(all.len(), 3);
    // Newest first.
    assert_eq!(all[0]["therapeutic_category"], "pediatrics");
    assert_eq!(all[2]["therapeutic_category"], "neurology");

    let approved = list(&client, &srv, "/api/products?regulatory_status=approved").await;
    assert_eq!(approved.len(), 1);

    let searched = list(&client, &srv, "/api/products?search=DERMA").await;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0]["therapeutic_category"], "dermatology");

    let res = client
        .get(srv.url("/api/products?spectrum_type=ruderalis"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_summarise_the_catalog() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    create_ok(&client, &srv, &product_body(json!(0.8), "neurology", None)).await;
    create_ok(&client, &srv, &product_body(json!(0.6), "dermatology", None)).await;

    let res = client.get(srv.url("/api/products/stats")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let stats: Value = res.json().await.unwrap();
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["at_risk"], 1);
    assert_eq!(stats["potent_without_risk"], 1);
    assert_eq!(stats["by_spectrum_type"]["sativa"], 2);
}

#[tokio::test]
async fn get_update_and_delete_lifecycle() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let created = create_ok(&client, &srv, &product_body(json!(0.1), "oncology", None)).await;
    let id = created["id"].as_str().unwrap().to_string();
    let item_url = srv.url(&format!("/api/products/{id}"));

    let res = client.get(&item_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);

    // Full update without a status keeps the stored one.
    let res = client
        .put(&item_url)
        .json(&json!({
            "name": "Renamed Oil",
            "spectrum_type": "indica",
            "thc_percent": "0.2",
            "cbd_percent": "3",
            "therapeutic_category": "oncology",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let replaced: Value = res.json().await.unwrap();
    assert_eq!(replaced["name"], "Renamed Oil");
    assert_eq!(replaced["regulatory_status"], "pending");
    assert_eq!(replaced["created_at"], created["created_at"]);

    let res = client
        .patch(&item_url)
        .json(&json!({ "thc_percent": 0.9, "regulatory_status": "approved" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.delete(&item_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(&item_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    let res = client.delete(&item_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_rejected() {
    let srv = TestServer::spawn(ValidationMode::Supplied).await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/products/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn status_only_patch_follows_validation_mode() {
    for (mode, expected) in [
        (ValidationMode::Supplied, StatusCode::OK),
        (ValidationMode::Merged, StatusCode::BAD_REQUEST),
    ] {
        let srv = TestServer::spawn(mode).await;
        let client = reqwest::Client::new();

        let body = product_body(json!(0.8), "neurology", Some("pending"));
        let created = create_ok(&client, &srv, &body).await;
        let id = created["id"].as_str().unwrap();

        let res = client
            .patch(srv.url(&format!("/api/products/{id}")))
            .json(&json!({ "regulatory_status": "approved" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), expected, "mode {mode:?}");
    }
}
