use std::env;
use std::fs;

use textvar::{logger, Config, GenerationOptions, PageState, StudioPage, VarClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Debug),
    )?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().collect();

    if args.get(1).map(String::as_str) == Some("serve") {
        return serve().await;
    }

    log::info!("🔍 Checking environment...");
    match env::var("VAR_API_URL") {
        Ok(url) => log::info!("VAR_API_URL: {}", url),
        Err(_) => {
            log::warn!("⚠️  VAR_API_URL is not set");
            log::warn!("💡 Point it at a running VAR service, e.g. http://localhost:8000");
        }
    }

    let config = Config::from_env();
    logger::log_startup_info(
        "textvar",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url.as_deref().unwrap_or("(not set)"),
    );

    log::info!("🔄 Creating VAR client...");
    let client = match VarClient::new(config.api.clone()) {
        Ok(client) => {
            log::info!("✅ VAR client initialized successfully");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize VAR client: {}", e);
            return Err(e.into());
        }
    };

    // Health check first, the way the page does on mount.
    log::info!("🏥 Checking service health...");
    match client.check_health().await {
        Ok(health) => {
            log::info!("✅ Service status: {}", health.status);
            if let Some(device) = &health.device {
                log::info!("🖥️  Device: {}", device);
            }
            if health.is_ready() {
                log::info!("✅ Model loaded and ready");
            } else {
                log::warn!("⏳ Model is still loading, generation may fail");
            }
        }
        Err(e) => {
            log::error!("❌ Health check failed: {}", e);
            log::warn!("💡 The service may be offline or still warming up");
        }
    }

    let prompt = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "a beautiful red rose flower".to_string());

    // Single generation through the page controller.
    log::info!("🎨 Generating image for prompt: {}", prompt);
    let mut page = StudioPage::new(client.clone());
    page.mount().await;
    page.set_prompt(&prompt);

    let generation_timer = logger::timer("generate");
    page.submit().await;
    generation_timer.stop();

    match page.state() {
        PageState::Success => {
            if let Some(image) = page.image() {
                log::info!("✅ Image generated successfully");
                log::info!("📏 Payload length: {} base64 chars", image.image_base64.len());

                let filename = image.suggested_filename();
                match image.decode_bytes() {
                    Ok(bytes) => match fs::write(&filename, bytes) {
                        Ok(_) => log::info!("💾 Image saved to: {}", filename),
                        Err(e) => log::error!("❌ Failed to save image: {}", e),
                    },
                    Err(e) => log::error!("❌ Failed to decode image payload: {}", e),
                }
            }
        }
        PageState::Failed => {
            log::error!(
                "❌ Generation failed: {}",
                page.error().unwrap_or("unknown error")
            );
        }
        _ => {}
    }

    // Batch generation, straight through the client.
    let batch_prompts = vec![
        "a yellow sunflower with green leaves".to_string(),
        "a purple orchid flower".to_string(),
    ];

    log::info!("🎨 Generating a batch of {} images...", batch_prompts.len());
    match client
        .image()
        .generate_batch(&batch_prompts, &GenerationOptions::default())
        .await
    {
        Ok(batch) => {
            log::info!("✅ Batch generation successful ({} images)", batch.len());
            for item in &batch.images {
                let filename = format!(
                    "generated_{}_{}.png",
                    item.prompt.replace(' ', "_"),
                    chrono::Utc::now().timestamp_millis()
                );
                match item.decode_bytes() {
                    Ok(bytes) => match fs::write(&filename, bytes) {
                        Ok(_) => log::info!("💾 Image saved to: {}", filename),
                        Err(e) => log::error!("❌ Failed to save image: {}", e),
                    },
                    Err(e) => log::error!("❌ Failed to decode image payload: {}", e),
                }
            }
        }
        Err(e) => {
            log::error!("❌ Batch generation failed: {}", e);
        }
    }

    log::info!("🎉 Demo completed");
    log::info!("💡 Check the generated image files in the current directory");
    Ok(())
}

#[cfg(feature = "server")]
async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    textvar::server::run(config).await?;
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    log::error!("❌ The demo frontend requires the `server` feature");
    log::info!("💡 Re-run with: cargo run --features server -- serve");
    Ok(())
}
