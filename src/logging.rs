// Centralized logging setup for tracing with runtime log levels, optional file and Loki sinks
use std::env;
use std::fs;
use std::sync::OnceLock; // For global file guard
use std::time::Instant;
use tracing::{Id, Subscriber, debug, field::Field, field::Visit, span};
use tracing_subscriber::{
    EnvFilter,
    fmt,
    layer::{Context, Layer, SubscriberExt},
    util::SubscriberInitExt,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

pub fn init_logging(service_name: String) -> eyre::Result<()> {
    // Load log levels for console and file from env
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    // Load file log flag from env
    let log_to_file = env::var("LOG_TO_FILE").unwrap_or_else(|_| "false".to_string()) == "true";

    // Set up EnvFilter for runtime log levels, filter globally to "warn", filter our own crate to the specified levels in .env
    let env_filter_console = EnvFilter::try_new(
        &format!("warn, crypto_trading_dashboard={}", console_log_level)
    ).unwrap_or_else(|_| EnvFilter::new("crypto_trading_dashboard=info"));

    let env_filter_file = EnvFilter::try_new(
        &format!("warn, crypto_trading_dashboard={}", file_log_level)
    ).unwrap_or_else(|_| EnvFilter::new("crypto_trading_dashboard=info"));

    // Console layer: always enabled, pretty human-readable logs
    let console_layer = fmt::Layer::new()
        .pretty()
        .with_filter(env_filter_console);

    // File layer: structured JSON logs with UTC timestamps, one file per service start
    let file_layer = if log_to_file {
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H:%M:%S").to_string();
        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir)?;
        let log_file_name = format!("{}_{}.log", service_name, timestamp);

        let file_appender = tracing_appender::rolling::never(log_dir, log_file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok(); // Store the guard globally

        Some(
            fmt::Layer::new()
                .json()
                .with_writer(non_blocking)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(env_filter_file),
        )
    } else {
        None
    };

    // Loki layer: ships logs to a Loki endpoint when LOKI_URL is set, labeled per service
    let loki_layer = match env::var("LOKI_URL") {
        Ok(loki_url) => {
            let env_filter_loki = EnvFilter::try_new(
                &format!("warn, crypto_trading_dashboard={}", file_log_level)
            ).unwrap_or_else(|_| EnvFilter::new("crypto_trading_dashboard=info"));

            let (loki_layer, loki_task) = tracing_loki::builder()
                .label("service", service_name.clone())?
                .build_url(url::Url::parse(&loki_url)?)?;
            tokio::spawn(loki_task);

            Some(loki_layer.with_filter(env_filter_loki))
        }
        Err(_) => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(loki_layer)
        .with(SpanTimingLayer)
        .init();

    Ok(())
}

// Custom layer to log wall-clock duration for spans created with a "timed" field = true
struct SpanTimingLayer;

struct StartInstant(Instant);

impl<S> Layer<S> for SpanTimingLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut timed = false;
            struct TimedVisitor<'a> { timed: &'a mut bool }
            impl<'a> Visit for TimedVisitor<'a> {
                fn record_bool(&mut self, field: &Field, value: bool) {
                    if field.name() == "timed" {
                        *self.timed = value;
                    }
                }
                fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
            }
            let mut visitor = TimedVisitor { timed: &mut timed };
            attrs.record(&mut visitor);
            if timed {
                span.extensions_mut().insert(StartInstant(Instant::now()));
            }
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            let start = span.extensions_mut().remove::<StartInstant>();
            if let Some(StartInstant(start)) = start {
                debug!(
                    span = span.name(),
                    total_time = ?start.elapsed(),
                    "span closed"
                );
            }
        }
    }
}
