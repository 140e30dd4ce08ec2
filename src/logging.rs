use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use edudesk_config::{LogConfig, RunMode};

const LOG_FILE_PREFIX: &str = "edudesk.json";

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("request", request_id = %request_id, method = %method, path = %matched_path);

    let response = next.run(req).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    span.in_scope(|| match status {
        500..=599 => error!(status, latency_ms, "Server error"),
        400..=499 => warn!(status, latency_ms, "Client error"),
        _ => info!(status, latency_ms, "Request completed"),
    });

    response
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},tower_http=warn,hyper=warn,h2=warn,sqlx=warn"
        ))
    })
}

/// Console output (JSON in release mode, compact otherwise) plus an
/// optional daily rolling JSON file under `config.dir`. `RUST_LOG` takes
/// precedence over `config.level`.
pub fn init_tracing(config: &LogConfig, mode: RunMode) -> anyhow::Result<()> {
    let console_layer = match mode {
        RunMode::Release => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        RunMode::Debug | RunMode::Test => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    let file_layer = if config.file_enabled {
        std::fs::create_dir_all(&config.dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, &config.dir, LOG_FILE_PREFIX);
        Some(
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false)
                .with_current_span(true)
                .with_span_list(true),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(
        level = %config.level,
        mode = ?mode,
        file = config.file_enabled,
        dir = %config.dir.display(),
        "tracing initialized"
    );
    Ok(())
}
