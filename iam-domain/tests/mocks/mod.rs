#![allow(dead_code)]

use async_trait::async_trait;
use iam_domain::{application::ports::ManagementApi, domain::errors::ApiError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One call received by [`MockManagementApi`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Mock management API: records every call and answers from a script.
///
/// Responses are consumed in order; once the script runs dry every call
/// succeeds with `{}`.
#[derive(Clone, Default)]
pub struct MockManagementApi {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    script: Arc<Mutex<VecDeque<Result<Value, ApiError>>>>,
}

impl MockManagementApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, value: Value) -> &Self {
        self.script.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn fail_with(&self, status: u16, message: &str) -> &Self {
        self.script.lock().unwrap().push_back(Err(ApiError::Status {
            status,
            message: message.to_string(),
        }));
        self
    }

    pub fn fail_transport(&self) -> &Self {
        self.script.lock().unwrap().push_back(Err(ApiError::Transport {
            message: "connection reset".to_string(),
        }));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.cloned(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Object(Default::default())))
    }
}

#[async_trait]
impl ManagementApi for MockManagementApi {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.record("GET", path, query, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.record("POST", path, &[], Some(body))
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.record("PATCH", path, &[], Some(body))
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.record("DELETE", path, &[], None).map(|_| ())
    }
}

/// Raw HTTP/1.1 response with a JSON content type
pub fn http_response(status: u16, reason: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// `204 No Content` without a body
pub fn no_content() -> String {
    "HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n".to_string()
}

/// Single-shot HTTP server on a loopback port.
///
/// Answers the first request with `response` and resolves the handle to the
/// raw request text (head and body).
pub async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

/// Server that accepts one connection and never answers
pub async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    base_url
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
