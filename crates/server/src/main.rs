use kuvert_ocr::{Extractor, OcrBackend, ReceiptPipeline};
use kuvert_server::{build_router, AppState, ServerConfig};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from_env()?;
    let extraction = config.load_extraction_config()?;
    tracing::info!(
        keywords = ?extraction.keywords,
        store_scan_lines = extraction.store_scan_lines,
        "extraction config loaded"
    );

    let pipeline = ReceiptPipeline::new(build_recognizer(&config), Extractor::new(&extraction));
    let app = build_router(
        AppState::new(pipeline, config.ocr_timeout, config.max_upload_bytes)
            .with_scan_limit(config.max_concurrent_scans),
    );

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "starting server");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kuvert_server=info,kuvert_ocr=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new("kuvert-server".into(), std::io::stdout))
        .init();
}

#[cfg(feature = "tesseract")]
fn build_recognizer(config: &ServerConfig) -> Box<dyn OcrBackend> {
    use kuvert_ocr::recognizer::tesseract_backend::TesseractRecognizer;

    tracing::info!(lang = %config.ocr_lang, "using Tesseract OCR backend");
    Box::new(TesseractRecognizer::new(config.tessdata.clone(), &config.ocr_lang))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_config: &ServerConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("built without the `tesseract` feature; every scan will fail");
    Box::new(kuvert_ocr::UnavailableRecognizer)
}
