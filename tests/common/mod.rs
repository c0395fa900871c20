#![allow(dead_code)]
use http_client::{HttpClient, Request, Response};
use http_types::StatusCode;
use melody_scope::{ClientConfig, MelodyScopeClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-api-key";

/// Canned answer for one Last.fm method.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this status and body
    Body(u16, String),
    /// Fail at the transport level
    ConnectionError(String),
    /// Never answer within any reasonable timeout
    Hang,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply::Body(200, body.to_string())
    }
}

/// HTTP client stub that answers from a script keyed by Last.fm method name and
/// records every URL it was asked for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    by_method: Arc<Mutex<HashMap<String, Reply>>>,
    by_track: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: &str, reply: Reply) -> Self {
        self.by_method
            .lock()
            .unwrap()
            .insert(method.to_string(), reply);
        self
    }

    /// Answer requests carrying `track=<track>` with `reply`, whatever the method.
    pub fn respond_for_track(self, track: &str, reply: Reply) -> Self {
        self.by_track.lock().unwrap().insert(track.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Query parameters of the `n`th request.
    pub fn params(&self, n: usize) -> HashMap<String, String> {
        let url: http_types::Url = self.requests()[n].parse().unwrap();
        url.query_pairs().into_owned().collect()
    }

    pub fn client(&self) -> MelodyScopeClient {
        self.client_with(ClientConfig::new().with_api_key(TEST_API_KEY))
    }

    pub fn client_with(&self, config: ClientConfig) -> MelodyScopeClient {
        MelodyScopeClient::new(Box::new(self.clone()), config)
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedClient {
    async fn send(&self, req: Request) -> Result<Response, http_types::Error> {
        let url = req.url().clone();
        self.requests.lock().unwrap().push(url.to_string());

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let reply = params
            .get("track")
            .and_then(|track| self.by_track.lock().unwrap().get(track).cloned())
            .or_else(|| {
                params
                    .get("method")
                    .and_then(|method| self.by_method.lock().unwrap().get(method).cloned())
            })
            .unwrap_or_else(|| Reply::Body(404, "{}".to_string()));

        match reply {
            Reply::Body(status, body) => {
                let mut response = Response::new(status);
                response.set_body(body);
                Ok(response)
            }
            Reply::ConnectionError(message) => {
                Err(http_types::Error::from_str(StatusCode::BadGateway, message))
            }
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Response::new(StatusCode::Ok))
            }
        }
    }
}
