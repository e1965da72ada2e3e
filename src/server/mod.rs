//! Minimal web frontend around the studio controller.
//!
//! Serves the interactive generation page plus the informational pages the
//! demo site ships. Markup is intentionally bare; the interesting part is
//! the request/response cycle through [`StudioPage`].

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;

use crate::{
    config::Config,
    models::{GenerationOptions, DEFAULT_CFG_SCALE},
    studio::{default_suggestions, PageState, StudioPage},
    var::VarClient,
};

struct AppState {
    client: VarClient,
    suggestions: Vec<String>,
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let port = config.port.unwrap_or(8080);
    let client = VarClient::new(config.api.clone())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let suggestions = config.suggestions.clone().unwrap_or_else(default_suggestions);

    crate::logger::log_config_info(&config);
    log::info!("🌐 Demo frontend listening on http://127.0.0.1:{}", port);

    let state = web::Data::new(AppState {
        client,
        suggestions,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(homepage))
            .route("/generate", web::post().to(generate))
            .route("/documentation", web::get().to(documentation))
            .route("/research-info", web::get().to(research_info))
            .route("/health", web::get().to(health))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[derive(Deserialize)]
struct HomeQuery {
    prompt: Option<String>,
}

/// Form fields arrive as strings; blank advanced fields fall back to the
/// defaults the same way the original inputs did.
#[derive(Deserialize)]
struct GenerateForm {
    prompt: String,
    cfg_scale: Option<String>,
    seed: Option<String>,
}

async fn homepage(state: web::Data<AppState>, query: web::Query<HomeQuery>) -> impl Responder {
    let mut page = StudioPage::new(state.client.clone()).with_suggestions(state.suggestions.clone());
    page.mount().await;
    if let Some(prompt) = &query.prompt {
        page.set_prompt(prompt.clone());
    }
    html_response(render_studio(&page))
}

async fn generate(state: web::Data<AppState>, form: web::Form<GenerateForm>) -> impl Responder {
    let cfg_scale = form
        .cfg_scale
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_CFG_SCALE);
    let mut options = GenerationOptions::new().with_cfg_scale(cfg_scale);
    if let Some(seed) = form.seed.as_deref().and_then(|raw| raw.trim().parse().ok()) {
        options = options.with_seed(seed);
    }

    let mut page = StudioPage::new(state.client.clone())
        .with_suggestions(state.suggestions.clone())
        .with_options(options);
    page.mount().await;
    page.set_prompt(form.prompt.clone());
    page.submit().await;

    html_response(render_studio(&page))
}

async fn health(state: web::Data<AppState>) -> impl Responder {
    let status = match state.client.check_health().await {
        Ok(status) => status,
        Err(e) => {
            log::warn!("Health proxy failed: {}", e);
            crate::models::HealthStatus::offline()
        }
    };
    HttpResponse::Ok().json(status)
}

async fn documentation() -> impl Responder {
    html_response(render_static_page(
        "Documentation",
        "Send a text prompt to the VAR service and receive a base64-encoded \
         PNG back. Endpoints: GET /health, POST /generate, POST /generate/batch. \
         Sampling parameters: cfg_scale (1.0-10.0, default 1.5), top_k \
         (default 900), top_p (default 0.96), optional seed.",
    ))
}

async fn research_info() -> impl Responder {
    html_response(render_static_page(
        "Research",
        "The backing model is a text-conditioned visual autoregressive (VAR) \
         transformer paired with a VQVAE decoder and a CLIP text encoder, \
         trained on flower imagery.",
    ))
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn render_studio(page: &StudioPage) -> String {
    let status_badge = match page.api_status() {
        Some(status) if status.is_ready() => "✓ Model Ready",
        Some(_) => "⏳ Model Loading...",
        None => "",
    };

    let suggestions = page
        .suggestions()
        .iter()
        .map(|s| {
            format!(
                "<a href=\"/?prompt={}\">{}</a>",
                urlencode(s),
                escape_html(s)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ");

    let preview = match page.state() {
        PageState::Success => match page.image() {
            Some(image) => format!(
                "<img src=\"{uri}\" alt=\"Generated\" height=\"350\"/>\
                 <p><a href=\"{uri}\" download=\"{name}\">⬇ Download</a></p>",
                uri = image.to_data_uri(),
                name = image.suggested_filename()
            ),
            None => String::new(),
        },
        PageState::Failed => format!(
            "<p class=\"error\">{}</p><p>Try again.</p>",
            escape_html(page.error().unwrap_or_default())
        ),
        _ => "<p>Generated image will appear here</p>".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>TextVAR</title></head>\n<body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/documentation\">Documentation</a> | \
         <a href=\"/research-info\">Research</a></nav>\n\
         <h1>Transform text into stunning images</h1>\n\
         <p>Turn your idea into reality using a text-conditioned VAR model</p>\n\
         <p>{status}</p>\n\
         <p><em>This model is trained on flower images. For best results, use \
         flower-related prompts.</em></p>\n\
         <form method=\"post\" action=\"/generate\">\n\
         <input type=\"text\" name=\"prompt\" value=\"{prompt}\" size=\"60\" \
         placeholder=\"Enter your text prompt (e.g., 'a beautiful red rose flower')...\"/>\n\
         <label>CFG Scale: <input type=\"number\" name=\"cfg_scale\" value=\"{cfg}\" \
         min=\"1\" max=\"10\" step=\"0.1\"/></label>\n\
         <label>Seed: <input type=\"number\" name=\"seed\" placeholder=\"Random\"/></label>\n\
         <button type=\"submit\">Generate</button>\n\
         </form>\n\
         <p>Suggestions: {suggestions}</p>\n\
         <h2>Image Preview</h2>\n{preview}\n\
         </body>\n</html>\n",
        status = status_badge,
        prompt = escape_html(page.prompt()),
        cfg = page.options().cfg_scale,
        suggestions = suggestions,
        preview = preview,
    )
}

fn render_static_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>TextVAR - {title}</title></head>\n<body>\n\
         <nav><a href=\"/\">Home</a> | <a href=\"/documentation\">Documentation</a> | \
         <a href=\"/research-info\">Research</a></nav>\n\
         <h1>{title}</h1>\n<p>{body}</p>\n</body>\n</html>\n",
        title = title,
        body = body,
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn urlencode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_escapes_spaces() {
        assert_eq!(urlencode("a red rose"), "a%20red%20rose");
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<img src=\"x\"> & more"),
            "&lt;img src=&quot;x&quot;&gt; &amp; more"
        );
    }
}
