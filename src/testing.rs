//! Test doubles for the injected capabilities.
//!
//! Provides:
//! - [`RecordingNotifier`]: collects alerts instead of showing them
//! - [`StubTransport`]: answers with a fixed status or fails as if offline
//! - [`StubGeolocation`]: returns a fixed position or error, counting calls
//! - [`CapturedLogs`]: an in-memory `tracing` sink for asserting on log lines
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use looma_scan::form::device_form;
//! use looma_scan::submit::{SubmitEvent, SubmitHandler};
//! use looma_scan::testing::{RecordingNotifier, StubTransport};
//!
//! # async fn example() {
//! let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
//! let notifier = Arc::new(RecordingNotifier::new());
//! let handler = SubmitHandler::new(form, Arc::new(StubTransport::status(200)), notifier.clone());
//! handler.handle(&SubmitEvent::new()).await;
//! assert_eq!(notifier.count(), 1);
//! # }
//! ```

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{PositionError, TransportError};
use crate::geolocation::{Coordinates, Geolocation};
use crate::notify::Notifier;
use crate::submit::SubmitEvent;
use crate::transport::{FormRequest, FormResponse, FormTransport};

/// A notifier that records every alert.
///
/// When built with [`observing`](Self::observing) it also records whether
/// the given submit event had its default prevented at the moment of each
/// alert.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    event: Option<SubmitEvent>,
    prevented: Mutex<Vec<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event.default_prevented()` alongside each alert.
    pub fn observing(event: SubmitEvent) -> Self {
        Self {
            event: Some(event),
            ..Self::default()
        }
    }

    /// Alerts in the order they were shown.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().expect("notifier mutex poisoned").len()
    }

    /// Prevented state of the observed event at each alert.
    pub fn prevented_at_alert(&self) -> Vec<bool> {
        self.prevented.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Some(event) = &self.event {
            self.prevented
                .lock()
                .expect("notifier mutex poisoned")
                .push(event.default_prevented());
        }
        self.messages
            .lock()
            .expect("notifier mutex poisoned")
            .push(message.to_string());
    }
}

enum StubReply {
    Status(u16),
    Offline,
}

/// A transport that never touches the network.
///
/// Yields once before answering so concurrent submissions interleave the
/// way real requests do.
pub struct StubTransport {
    reply: StubReply,
    call_count: AtomicU32,
    last_request: Mutex<Option<FormRequest>>,
}

impl StubTransport {
    /// Answer every request with `status`.
    pub fn status(status: u16) -> Self {
        Self::with_reply(StubReply::Status(status))
    }

    /// Fail every request as if the network were down.
    pub fn offline() -> Self {
        Self::with_reply(StubReply::Offline)
    }

    fn with_reply(reply: StubReply) -> Self {
        Self {
            reply,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of requests received.
    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<FormRequest> {
        self.last_request
            .lock()
            .expect("transport mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl FormTransport for StubTransport {
    async fn send(&self, request: FormRequest) -> Result<FormResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().expect("transport mutex poisoned") = Some(request);
        tokio::task::yield_now().await;

        match self.reply {
            StubReply::Status(status) => Ok(FormResponse::new(status)),
            StubReply::Offline => Err(TransportError::Connection {
                reason: "network unreachable".to_string(),
            }),
        }
    }
}

/// A geolocation provider with a canned answer.
pub struct StubGeolocation {
    result: Result<Coordinates, PositionError>,
    call_count: AtomicU32,
}

impl StubGeolocation {
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            result: Ok(coordinates),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn failing(error: PositionError) -> Self {
        Self {
            result: Err(error),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Geolocation for StubGeolocation {
    fn name(&self) -> &str {
        "stub"
    }

    async fn current_position(&self) -> Result<Coordinates, PositionError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }
}

/// Collects formatted `tracing` output in memory.
///
/// Install [`subscriber`](Self::subscriber) with
/// `tracing::subscriber::set_default` for the duration of a test. Under a
/// current-thread runtime the guard covers every await point in the test.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain-text subscriber at every level, without timestamps or colour.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer mutex poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Lines emitted at `level`, e.g. `"WARN"` or `"ERROR"`.
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

/// Writer handed out by [`CapturedLogs`] for each event.
pub struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: self.buffer.clone(),
        }
    }
}
