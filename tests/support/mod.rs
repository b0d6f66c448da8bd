//! Shared helpers for integration tests against a mock download service.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use media_download_client::{ClientConfig, DownloadClient};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use wiremock::MockServer;

/// Config pointed at `server` with short timeouts and no retries.
pub fn fast_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        timeout_ms: 5_000,
        retries: 0,
        retry_delay_ms: 10,
        batch_delay_ms: 0,
    }
}

/// Client for `server` without retries.
pub fn client_for(server: &MockServer) -> DownloadClient {
    DownloadClient::with_config(fast_config(server)).expect("client should build")
}

/// Client for `server` retrying `retries` times with a 10ms base delay.
pub fn retrying_client_for(server: &MockServer, retries: u32) -> DownloadClient {
    let config = ClientConfig {
        retries,
        ..fast_config(server)
    };
    DownloadClient::with_config(config).expect("client should build")
}

/// Every recorded field value of every event, rendered as text.
#[derive(Clone, Default)]
pub struct CapturedFields {
    values: Arc<Mutex<Vec<String>>>,
}

impl CapturedFields {
    pub fn all(&self) -> Vec<String> {
        self.values.lock().expect("capture lock").clone()
    }
}

struct FieldVisitor<'a> {
    values: &'a mut Vec<String>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, _field: &Field, value: &str) {
        self.values.push(value.to_string());
    }

    fn record_debug(&mut self, _field: &Field, value: &dyn std::fmt::Debug) {
        self.values.push(format!("{value:?}"));
    }
}

/// Layer recording event and span fields into a [`CapturedFields`].
pub struct CaptureLayer {
    pub fields: CapturedFields,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut values = self.fields.values.lock().expect("capture lock");
        event.record(&mut FieldVisitor {
            values: &mut values,
        });
    }

    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: Context<'_, S>,
    ) {
        let mut values = self.fields.values.lock().expect("capture lock");
        attrs.record(&mut FieldVisitor {
            values: &mut values,
        });
    }
}
