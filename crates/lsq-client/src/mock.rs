//! In-memory transport that records calls and plays back canned replies.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use lsq_core::error::RpcError;

use crate::transport::RpcTransport;

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub args: Vec<Value>,
}

/// Transport double for tests.
///
/// Replies are queued per method and consumed in order; a method with no
/// queued reply fails with [`RpcError::Remote`].
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Result<Value, RpcError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `method`.
    pub fn reply(&self, method: &str, value: Value) -> &Self {
        self.push(method, Ok(value));
        self
    }

    /// Queue a failure for `method`.
    pub fn fail(&self, method: &str, error: RpcError) -> &Self {
        self.push(method, Err(error));
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, method: &str, reply: Result<Value, RpcError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies
                .entry(method.to_string())
                .or_default()
                .push_back(reply);
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method: method.to_string(),
                args,
            });
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.get_mut(method).and_then(VecDeque::pop_front))
            .unwrap_or_else(|| {
                Err(RpcError::Remote {
                    method: method.to_string(),
                    message: "no canned reply".to_string(),
                })
            })
    }
}
