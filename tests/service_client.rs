mod common;

use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use textvar::{Deadlines, GenerationOptions, VarApiConfig, VarClient, VarError};

use common::{
    client_for, failing_generation_service, generation_service, healthy_health_route,
    spawn_service, unreachable_addr, Recorded,
};

#[tokio::test]
async fn health_reports_model_ready() {
    let addr = spawn_service(healthy_health_route()).await;
    let client = client_for(addr);

    let health = client.check_health().await.unwrap();

    assert_eq!(health.status, "healthy");
    assert!(health.model_loaded);
    assert_eq!(health.device.as_deref(), Some("cuda"));
}

#[tokio::test]
async fn unreachable_service_yields_request_error() {
    let addr = unreachable_addr().await;
    let client = client_for(addr);

    let result = client.check_health().await;

    assert!(matches!(result, Err(VarError::RequestError(_))));
}

#[tokio::test]
async fn generate_echoes_input_prompt() {
    let recorded = Recorded::default();
    let addr = spawn_service(generation_service(recorded.clone())).await;
    let client = client_for(addr);

    let image = client
        .image()
        .generate("a beautiful red rose flower", &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(image.prompt, "a beautiful red rose flower");
    assert_eq!(image.image_base64, "aGVsbG8=");
    assert_eq!(
        image.parameters.prompt.as_deref(),
        Some("a beautiful red rose flower")
    );
    assert_eq!(recorded.hit_count(), 1);
}

#[tokio::test]
async fn omitted_seed_reaches_service_as_null() {
    let recorded = Recorded::default();
    let addr = spawn_service(generation_service(recorded.clone())).await;
    let client = client_for(addr);

    client
        .image()
        .generate("a white daisy flower", &GenerationOptions::default())
        .await
        .unwrap();

    let body = recorded.last_body().unwrap();
    assert_eq!(body["seed"], Value::Null);
    assert_eq!(body["cfg_scale"], json!(1.5));
    assert_eq!(body["top_k"], json!(900));
    assert_eq!(body["top_p"], json!(0.96));
}

#[tokio::test]
async fn integer_seed_reaches_service_verbatim() {
    let recorded = Recorded::default();
    let addr = spawn_service(generation_service(recorded.clone())).await;
    let client = client_for(addr);

    let options = GenerationOptions::new().with_seed(1234);
    client
        .image()
        .generate("a blue iris flower", &options)
        .await
        .unwrap();

    let body = recorded.last_body().unwrap();
    assert_eq!(body["seed"], json!(1234));
}

#[tokio::test]
async fn server_reported_failure_carries_message() {
    let addr = spawn_service(failing_generation_service(json!({
        "success": false,
        "prompt": "x",
        "parameters": {},
        "error": "bad prompt"
    })))
    .await;
    let client = client_for(addr);

    let result = client
        .image()
        .generate("x", &GenerationOptions::default())
        .await;

    match result {
        Err(VarError::ServiceError(message)) => assert_eq!(message, "bad prompt"),
        other => panic!("expected service error, got {:?}", other.map(|i| i.prompt)),
    }
}

#[tokio::test]
async fn missing_error_field_falls_back_to_generic_message() {
    let addr = spawn_service(failing_generation_service(json!({
        "success": false,
        "prompt": "x",
        "parameters": {}
    })))
    .await;
    let client = client_for(addr);

    let result = client
        .image()
        .generate("x", &GenerationOptions::default())
        .await;

    match result {
        Err(VarError::ServiceError(message)) => assert_eq!(message, "Failed to generate image"),
        other => panic!("expected service error, got {:?}", other.map(|i| i.prompt)),
    }
}

#[tokio::test]
async fn batch_preserves_prompt_order() {
    let recorded = Recorded::default();
    let addr = spawn_service(generation_service(recorded)).await;
    let client = client_for(addr);

    let prompts = vec!["a".to_string(), "b".to_string()];
    let batch = client
        .image()
        .generate_batch(&prompts, &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.images[0].prompt, "a");
    assert_eq!(batch.images[1].prompt, "b");
}

#[tokio::test]
async fn oversized_batch_is_rejected_locally() {
    let recorded = Recorded::default();
    let addr = spawn_service(generation_service(recorded.clone())).await;
    let client = client_for(addr);

    let prompts: Vec<String> = (0..9).map(|i| format!("prompt {}", i)).collect();
    let result = client
        .image()
        .generate_batch(&prompts, &GenerationOptions::default())
        .await;

    assert!(matches!(result, Err(VarError::RequestError(_))));
    assert_eq!(recorded.hit_count(), 0);
}

#[tokio::test]
async fn warming_up_service_maps_to_unavailable() {
    let app = healthy_health_route().route(
        "/generate",
        post(|_: Json<Value>| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"detail": "Model not loaded"})),
            )
        }),
    );
    let addr = spawn_service(app).await;
    let client = client_for(addr);

    let result = client
        .image()
        .generate("x", &GenerationOptions::default())
        .await;

    match result {
        Err(VarError::UnavailableError(detail)) => assert_eq!(detail, "Model not loaded"),
        other => panic!("expected unavailable error, got {:?}", other.map(|i| i.prompt)),
    }
}

#[tokio::test]
async fn slow_generation_times_out() {
    let app = Router::new().route(
        "/generate",
        post(|_: Json<Value>| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({"success": true, "image_base64": "aGVsbG8=", "prompt": "x", "parameters": {}}))
        }),
    );
    let addr = spawn_service(app).await;

    let config = VarApiConfig::new()
        .with_base_url(format!("http://{}", addr))
        .with_deadlines(Deadlines::new().with_generate(Duration::from_millis(50)));
    let client = VarClient::new(config).unwrap();

    let result = client
        .image()
        .generate("x", &GenerationOptions::default())
        .await;

    assert!(matches!(result, Err(VarError::TimeoutError(_))));
}

#[tokio::test]
async fn trailing_slash_base_url_is_tolerated() {
    let addr = spawn_service(healthy_health_route()).await;
    let client =
        VarClient::new(VarApiConfig::new().with_base_url(format!("http://{}/", addr))).unwrap();

    assert_eq!(client.base_url(), format!("http://{}", addr));
    assert!(client.check_health().await.unwrap().model_loaded);
}
