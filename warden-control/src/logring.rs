//! The 4096-byte log ring buffer observability endpoint (§6).
//!
//! The original module appended every log line to a plain file
//! (`log.c`'s `log_message`). The consolidated design asks for a bounded
//! ring instead, so old entries are naturally evicted rather than growing a
//! file without limit. Implemented as a `tracing_subscriber::Layer` so it
//! composes with the rest of the `tracing` subscriber stack instead of
//! requiring call sites to log twice.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context as LayerContext;
use tracing_subscriber::registry::LookupSpan;
use warden_concurrency::sync::Mutex;

const RING_CAPACITY: usize = 4096;

struct RingBuf {
    data: Vec<u8>,
    write_pos: usize,
    len: usize,
}

impl RingBuf {
    fn new() -> Self {
        RingBuf {
            data: vec![0u8; RING_CAPACITY],
            write_pos: 0,
            len: 0,
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.data[self.write_pos] = byte;
            self.write_pos = (self.write_pos + 1) % RING_CAPACITY;
            if self.len < RING_CAPACITY {
                self.len += 1;
            }
        }
    }

    /// Drains the ring in chronological order, oldest entry first.
    fn drain(&mut self) -> Vec<u8> {
        let out = if self.len < RING_CAPACITY {
            self.data[..self.len].to_vec()
        } else {
            let mut out = Vec::with_capacity(RING_CAPACITY);
            out.extend_from_slice(&self.data[self.write_pos..]);
            out.extend_from_slice(&self.data[..self.write_pos]);
            out
        };
        self.write_pos = 0;
        self.len = 0;
        out
    }
}

/// The shared ring, read by the log-stream observability endpoint and
/// written by [`LogRingLayer`].
pub struct LogRing {
    buf: Mutex<RingBuf>,
}

impl LogRing {
    pub fn new() -> Arc<LogRing> {
        Arc::new(LogRing {
            buf: Mutex::new(RingBuf::new()),
        })
    }

    fn record(&self, bytes: &[u8]) {
        self.buf.lock().push(bytes);
    }

    /// Drains the ring, returning its contents as text (lossy: a line
    /// straddling the wrap point may be truncated, which is inherent to a
    /// byte ring rather than a line ring).
    pub fn drain_text(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().drain()).into_owned()
    }
}

struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        }
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG | Level::TRACE => "DEBUG",
    }
}

/// A `tracing_subscriber::Layer` that formats every event as
/// `[YYYY-MM-DD HH:MM:SS] [LEVEL] message` and appends it to a [`LogRing`].
pub struct LogRingLayer {
    ring: Arc<LogRing>,
}

impl LogRingLayer {
    pub fn new(ring: Arc<LogRing>) -> Self {
        LogRingLayer { ring }
    }
}

impl<S> Layer<S> for LogRingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!(
            "[{timestamp}] [{}] {}\n",
            level_label(event.metadata().level()),
            visitor.message
        );
        self.ring.record(line.as_bytes());
    }
}
