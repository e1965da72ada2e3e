use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use textvar::{VarApiConfig, VarClient};

/// Request log shared with mock handlers: how many generation calls arrived
/// and the JSON body of the last one.
#[derive(Clone, Default)]
pub struct Recorded {
    pub hits: Arc<AtomicUsize>,
    pub last_body: Arc<Mutex<Option<Value>>>,
}

impl Recorded {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }
}

/// Bind a loopback listener and serve the router in the background.
pub async fn spawn_service(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Grab an address nothing is listening on.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client_for(addr: SocketAddr) -> VarClient {
    VarClient::new(VarApiConfig::new().with_base_url(format!("http://{}", addr))).unwrap()
}

pub fn healthy_health_route() -> Router {
    Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "status": "healthy",
                "device": "cuda",
                "model_loaded": true,
                "vae_loaded": true,
                "clip_loaded": true
            }))
        }),
    )
}

/// A well-behaved mock of the generation service: echoes prompts back and
/// records every request it sees.
pub fn generation_service(recorded: Recorded) -> Router {
    let single = recorded.clone();
    let batch = recorded;

    healthy_health_route()
        .route(
            "/generate",
            post(move |Json(body): Json<Value>| {
                let recorded = single.clone();
                async move {
                    recorded.hits.fetch_add(1, Ordering::SeqCst);
                    *recorded.last_body.lock().unwrap() = Some(body.clone());
                    Json(json!({
                        "success": true,
                        "image_base64": "aGVsbG8=",
                        "prompt": body["prompt"],
                        "parameters": {
                            "prompt": body["prompt"],
                            "cfg_scale": body["cfg_scale"],
                            "top_k": body["top_k"],
                            "top_p": body["top_p"],
                            "seed": body["seed"]
                        }
                    }))
                }
            }),
        )
        .route(
            "/generate/batch",
            post(move |Json(body): Json<Value>| {
                let recorded = batch.clone();
                async move {
                    recorded.hits.fetch_add(1, Ordering::SeqCst);
                    *recorded.last_body.lock().unwrap() = Some(body.clone());
                    let prompts = body["prompts"].as_array().cloned().unwrap_or_default();
                    let images: Vec<Value> = prompts
                        .iter()
                        .map(|prompt| json!({"image_base64": "aGVsbG8=", "prompt": prompt}))
                        .collect();
                    Json(json!({
                        "success": true,
                        "count": images.len(),
                        "images": images,
                        "parameters": {
                            "cfg_scale": body["cfg_scale"],
                            "top_k": body["top_k"],
                            "top_p": body["top_p"],
                            "seed": body["seed"]
                        }
                    }))
                }
            }),
        )
}

/// A mock that always rejects generation with the given envelope.
pub fn failing_generation_service(envelope: Value) -> Router {
    healthy_health_route().route(
        "/generate",
        post(move |_: Json<Value>| {
            let envelope = envelope.clone();
            async move { Json(envelope) }
        }),
    )
}
