//! Scripted in-process engine for tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use parking_lot::Mutex;
use serde_json::Value;

use crate::engine::{Engine, EngineError, EngineFactory, LoadSignal};

/// How the fake answers one evaluation.
#[derive(Clone)]
pub(crate) enum FakeReply {
    /// Return this text.
    Value(String),
    /// Raise a script error with this message.
    Error(String),
    /// Await for the duration, then return the text.
    Delay(Duration, String),
    /// Block the engine thread for the duration, then return the text.
    Block(Duration, String),
    /// Never complete.
    Hang,
}

/// JSON text as a script ending in `JSON.stringify(...)` would produce it.
pub(crate) fn json_reply(value: Value) -> FakeReply {
    FakeReply::Value(value.to_string())
}

type Responder = Arc<dyn Fn(&str) -> FakeReply + Send + Sync>;

/// Shared state behind a [`FakeEngine`], inspectable from the test thread.
pub(crate) struct FakeBrowser {
    responder: Mutex<Responder>,
    /// Time until the page reports idle after a navigation; `None` never does.
    load_time: Mutex<Option<Duration>>,
    navigate_error: Mutex<Option<String>>,
    pub navigations: Mutex<Vec<String>>,
    pub evaluations: Mutex<Vec<String>>,
    pub shutdowns: Mutex<u32>,
}

impl FakeBrowser {
    pub fn new(responder: impl Fn(&str) -> FakeReply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            responder: Mutex::new(Arc::new(responder)),
            load_time: Mutex::new(Some(Duration::from_millis(10))),
            navigate_error: Mutex::new(None),
            navigations: Mutex::new(Vec::new()),
            evaluations: Mutex::new(Vec::new()),
            shutdowns: Mutex::new(0),
        })
    }

    /// A browser whose pages serve `html` and answer every other script with `{}`.
    pub fn serving(html: &str) -> Arc<Self> {
        let html = Value::String(html.to_string());
        Self::new(move |script| {
            if script.contains("outerHTML") {
                json_reply(html.clone())
            } else {
                json_reply(serde_json::json!({}))
            }
        })
    }

    pub fn set_responder(&self, responder: impl Fn(&str) -> FakeReply + Send + Sync + 'static) {
        *self.responder.lock() = Arc::new(responder);
    }

    pub fn set_load_time(&self, load_time: Option<Duration>) {
        *self.load_time.lock() = load_time;
    }

    pub fn fail_navigation(&self, message: &str) {
        *self.navigate_error.lock() = Some(message.to_string());
    }

    pub fn factory(self: &Arc<Self>) -> EngineFactory {
        let browser = self.clone();
        Arc::new(move |signal: LoadSignal| {
            let engine: Box<dyn Engine> = Box::new(FakeEngine {
                browser: browser.clone(),
                signal,
            });
            let ready: LocalBoxFuture<'static, Result<Box<dyn Engine>, EngineError>> =
                Box::pin(async move { Ok(engine) });
            ready
        })
    }
}

struct FakeEngine {
    browser: Arc<FakeBrowser>,
    signal: LoadSignal,
}

#[async_trait(?Send)]
impl Engine for FakeEngine {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.browser.navigations.lock().push(url.to_string());
        if let Some(message) = self.browser.navigate_error.lock().clone() {
            return Err(EngineError::Navigation(message));
        }

        self.signal.loading();
        if let Some(load_time) = *self.browser.load_time.lock() {
            let signal = self.signal.clone();
            tokio::spawn(async move {
                tokio::time::sleep(load_time).await;
                signal.idle();
            });
        }
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<String, EngineError> {
        self.browser.evaluations.lock().push(script.to_string());
        let responder = self.browser.responder.lock().clone();
        match responder(script) {
            FakeReply::Value(text) => Ok(text),
            FakeReply::Error(message) => Err(EngineError::Script(message)),
            FakeReply::Delay(duration, text) => {
                tokio::time::sleep(duration).await;
                Ok(text)
            }
            FakeReply::Block(duration, text) => {
                std::thread::sleep(duration);
                Ok(text)
            }
            FakeReply::Hang => std::future::pending().await,
        }
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        *self.browser.shutdowns.lock() += 1;
        Ok(())
    }
}
