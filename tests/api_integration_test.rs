use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use formgate::adapters::metrics_handler::MetricsCollector;
use formgate::adapters::options::{CallbackRegistry, OptionsPort};
use formgate::config::{ServerSettings, Settings};
use formgate::domain::{FormSchema, OptionItem};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::util::ServiceExt;

/// Mirrors the original parameter lookup: the option list depends on the
/// currently selected target.
struct ParameterProvider;

#[async_trait]
impl OptionsPort for ParameterProvider {
    async fn options(&self, deps: &HashMap<String, Value>) -> anyhow::Result<Vec<OptionItem>> {
        let target = deps.get("target").and_then(|v| v.as_str()).unwrap_or("");
        let names: &[&str] = match target {
            "target 1" => &["parameter 1"],
            "target 2" => &["parameter 2"],
            _ => &[],
        };
        Ok(names
            .iter()
            .map(|n| OptionItem {
                label: n.to_string(),
                value: json!(n),
            })
            .collect())
    }
}

fn form(value: Value) -> FormSchema {
    serde_json::from_value(value).unwrap()
}

fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        forms: vec![
            form(json!({
                "title": "Get Parameter",
                "activity": "get-parameter",
                "endpoint": "/get-parameter",
                "arguments": [
                    { "name": "target", "type": "list", "default": "",
                      "dataSource": { "type": "static",
                                      "data": ["target 1", "target 2"] } },
                    { "name": "parameter", "type": "list", "default": "",
                      "dataSource": { "type": "callback",
                                      "dependencies": ["target"] } },
                    { "name": "timeout", "type": "number", "default": 30 }
                ]
            })),
            form(json!({
                "activity": "set-parameter",
                "endpoint": "/set-parameter",
                "arguments": [
                    { "name": "target", "type": "list", "default": "",
                      "dataSource": { "type": "remote",
                                      "url": "/set-parameter/targets" } }
                ]
            })),
            form(json!({
                "activity": "inventory",
                "endpoint": "/inventory",
                "arguments": [
                    { "name": "item", "type": "autocomplete", "default": null,
                      "dataSource": { "type": "static",
                                      "data": [
                                          { "name": "Widget", "sku": "W-1" },
                                          { "name": "Gadget", "sku": "G-2" }
                                      ],
                                      "labelKey": "name",
                                      "valueKey": "sku",
                                      "searchParam": "search" } }
                ]
            })),
        ],
    }
}

fn test_app(registry: CallbackRegistry) -> axum::Router {
    let settings = Arc::new(RwLock::new(test_settings()));
    let metrics = Arc::new(MetricsCollector::new().unwrap());
    formgate::create_app(settings, Arc::new(registry), metrics)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_list_forms() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) = get_json(&app, "/api/forms").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let forms = body["data"].as_array().unwrap();
    assert_eq!(forms.len(), 3);
    assert_eq!(forms[0]["activity"], "get-parameter");
    assert_eq!(forms[0]["title"], "Get Parameter");
    assert_eq!(forms[0]["argumentCount"], 3);
}

#[tokio::test]
async fn test_get_form() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) = get_json(&app, "/api/forms/get-parameter").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["activity"], "get-parameter");
    assert_eq!(body["data"]["method"], "POST");
    assert_eq!(body["data"]["arguments"][2]["default"], json!(30));
}

#[tokio::test]
async fn test_get_unknown_form_is_404() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) = get_json(&app, "/api/forms/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_static_options() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) =
        get_json(&app, "/api/forms/get-parameter/fields/target/options").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["label"], "target 1");

    // Search narrows by label
    let (status, body) =
        get_json(&app, "/api/forms/get-parameter/fields/target/options?q=2").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["value"], "target 2");
}

#[tokio::test]
async fn test_static_options_with_mapping_keys() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) =
        get_json(&app, "/api/forms/inventory/fields/item/options").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["label"], "Widget");
    assert_eq!(items[0]["value"], "W-1");

    // The declared searchParam, not "q", carries the search string
    let (status, body) =
        get_json(&app, "/api/forms/inventory/fields/item/options?search=gad").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["value"], "G-2");

    let (status, body) =
        get_json(&app, "/api/forms/inventory/fields/item/options?q=gad").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_callback_options_with_dependency() {
    let mut registry = CallbackRegistry::new();
    registry.register("get-parameter", "parameter", Arc::new(ParameterProvider));
    let app = test_app(registry);

    let (status, body) = get_json(
        &app,
        "/api/forms/get-parameter/fields/parameter/options?target=target%201",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["label"], "parameter 1");

    // No dependency value selected yet: empty list, not an error
    let (status, body) =
        get_json(&app, "/api/forms/get-parameter/fields/parameter/options").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_without_provider_is_404() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) =
        get_json(&app, "/api/forms/get-parameter/fields/parameter/options").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No callback provider"));
}

#[tokio::test]
async fn test_remote_options_resolved_by_client() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) =
        get_json(&app, "/api/forms/set-parameter/fields/target/options").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("client"));
}

#[tokio::test]
async fn test_options_for_field_without_source() {
    let app = test_app(CallbackRegistry::new());

    let (status, _body) =
        get_json(&app, "/api/forms/get-parameter/fields/timeout/options").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app(CallbackRegistry::new());

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["forms_loaded"], json!(3));

    let (status, _) = get_json(&app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(&app, "/health/live").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_app(CallbackRegistry::new());

    // Serve a schema and an option lookup so the counters have samples
    let _ = get_json(&app, "/api/forms/get-parameter").await;
    let _ = get_json(&app, "/api/forms/get-parameter/fields/target/options").await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("formgate_forms_served_total"));
    assert!(text.contains("formgate_option_lookups_total"));
}
