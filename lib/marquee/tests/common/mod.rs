//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use marquee::navigation::Navigator;
use tokio::sync::Notify;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Navigator recording every location it is sent to.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
    notify: Notify,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Wait until at least `count` navigations happened, or give up after a
    /// few seconds.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        let _ = tokio::time::timeout(Duration::from_secs(5), async {
            while self.visited().len() < count {
                self.notify.notified().await;
            }
        })
        .await;
        self.visited()
    }
}

impl Navigator for RecordingNavigator {
    fn goto<'a>(&'a self, location: &'a str) -> BoxFuture<'a, ()> {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(location.to_string());
        }
        self.notify.notify_one();
        future::ready(()).boxed()
    }
}

/// A captured `tracing` event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// Layer collecting event messages.
#[derive(Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Install the layer for the current thread.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.0,
            });
        }
    }
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> url::Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap_or_else(|err| panic!("{err}"));
    let port = listener.local_addr().map(|addr| addr.port()).unwrap_or_else(|err| panic!("{err}"));
    drop(listener);
    url::Url::parse(&format!("http://127.0.0.1:{port}")).unwrap_or_else(|err| panic!("{err}"))
}

pub fn url(raw: &str) -> url::Url {
    url::Url::parse(raw).unwrap_or_else(|err| panic!("invalid url {raw}: {err}"))
}
