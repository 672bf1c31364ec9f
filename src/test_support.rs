// src/test_support.rs
// Scripted fake HTTP endpoint for tests

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use url::Url;

/// One scripted answer, consumed by one incoming connection
#[derive(Debug, Clone)]
pub enum Reply {
    Respond {
        status: u16,
        reason: &'static str,
        body: String,
    },
    /// Accept the connection and never answer
    Silent,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self::with_body(200, "OK", body)
    }

    pub fn status(status: u16, reason: &'static str) -> Self {
        Self::with_body(status, reason, "")
    }

    pub fn with_body(status: u16, reason: &'static str, body: &str) -> Self {
        Reply::Respond {
            status,
            reason,
            body: body.to_string(),
        }
    }
}

pub struct MockServer {
    base: Url,
    requests: Arc<Mutex<Vec<String>>>,
    task: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Serve `replies` in order, one per connection, on an ephemeral port
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        let task = tokio::spawn(async move {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                seen.lock().await.push(request);

                match reply {
                    Reply::Respond {
                        status,
                        reason,
                        body,
                    } => {
                        let response = format!(
                            "HTTP/1.1 {status} {reason}\r\n\
                             Content-Type: application/json\r\n\
                             Content-Length: {}\r\n\
                             Connection: close\r\n\r\n{body}",
                            body.len()
                        );
                        let _ = stream.write_all(response.as_bytes()).await;
                        let _ = stream.shutdown().await;
                    }
                    Reply::Silent => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        drop(stream);
                    }
                }
            }
        });

        Self {
            base: Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
            requests,
            task,
        }
    }

    pub fn url(&self, path: &str) -> Url {
        self.base.join(path).unwrap()
    }

    /// Raw request heads received so far
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    /// A URL on a port nothing listens on
    pub async fn closed_port_url() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
