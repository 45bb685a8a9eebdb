//! Scripted adapters for chain and batch tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cardprobe_core::{ProductId, SourceKind};
use futures::future::{BoxFuture, FutureExt};
use serde_json::{json, Value};

use crate::error::FetchError;
use crate::sources::{RawPayload, SourceAdapter};

pub(crate) enum Script {
    /// Answers with a 503.
    Unavailable,
    /// Answers with `body` for every id.
    Payload(Value),
    /// Answers with a name derived from the id.
    NamedAfterId,
    /// Like `NamedAfterId` for the listed ids, `Unavailable` for the rest.
    NamedFor(Vec<&'static str>),
}

pub(crate) struct FakeAdapter {
    kind: SourceKind,
    script: Script,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl FakeAdapter {
    pub(crate) fn new(kind: SourceKind, script: Script) -> Self {
        Self {
            kind,
            script,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared call counter, readable after the adapter is boxed into a chain.
    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl SourceAdapter for FakeAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch<'a>(&'a self, id: &'a ProductId) -> BoxFuture<'a, Result<RawPayload, FetchError>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let body = match &self.script {
                Script::Unavailable => None,
                Script::Payload(body) => Some(body.clone()),
                Script::NamedAfterId => Some(named_body(id)),
                Script::NamedFor(known) => known.contains(&id.as_str()).then(|| named_body(id)),
            };
            let Some(body) = body else {
                return Err(FetchError::UnexpectedStatus {
                    status: 503,
                    url: format!("https://{}.example.com/{id}", self.kind),
                });
            };
            Ok(RawPayload {
                source: self.kind,
                content_encoding: None,
                url: format!("https://{}.example.com/{id}", self.kind),
                body,
            })
        }
        .boxed()
    }
}

fn named_body(id: &ProductId) -> Value {
    let name = format!("Товар номер {id}");
    json!({"imt_name": name, "name": name, "title": name})
}

pub(crate) fn call_count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}
