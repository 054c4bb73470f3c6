//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::{stream, StreamExt};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, ResponseBody};
use crate::transport::Transport;

enum Canned {
    Respond {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },
    Fail(String),
    Hang,
    Stall(u16),
}

/// Replays queued answers in order and records every request it sees.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    answers: Arc<Mutex<VecDeque<Canned>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl std::fmt::Debug for FakeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FakeTransport")
    }
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, headers: &[(&str, &str)], body: &str) {
        self.answers.lock().unwrap().push_back(Canned::Respond {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        });
    }

    pub(crate) fn fail(&self, message: &str) {
        self.answers.lock().unwrap().push_back(Canned::Fail(message.to_string()));
    }

    pub(crate) fn hang(&self) {
        self.answers.lock().unwrap().push_back(Canned::Hang);
    }

    /// Answer with `status` and a body that never yields a chunk.
    pub(crate) fn stall(&self, status: u16) {
        self.answers.lock().unwrap().push_back(Canned::Stall(status));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let answer = self.answers.lock().unwrap().pop_front();
        match answer {
            Some(Canned::Respond { status, headers, body }) => Ok(HttpResponse {
                status,
                headers,
                body: body.into(),
            }),
            Some(Canned::Fail(message)) => Err(TransportError::new(message)),
            Some(Canned::Hang) => std::future::pending().await,
            Some(Canned::Stall(status)) => Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: ResponseBody::from_stream(stream::pending::<Result<bytes::Bytes, TransportError>>().boxed()),
            }),
            None => Err(TransportError::new("no canned response")),
        }
    }
}
