//! HttpDeliveryClient - one authenticated POST per record

use std::time::{Duration, Instant};

use contracts::{CredentialProvider, DeliveryClient, DeliveryOutcome, Record, RelayConfig};
use observability::metrics::{record_delivery_latency_ms, record_delivery_outcome};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::DispatcherError;

/// Header carrying the credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Request body sent for each record
#[derive(Debug, Serialize)]
pub struct DeliveryBody<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Interests")]
    pub interests: &'a str,
}

impl<'a> From<&'a Record> for DeliveryBody<'a> {
    fn from(record: &'a Record) -> Self {
        Self {
            name: &record.name,
            interests: &record.interests,
        }
    }
}

/// Posts each record to `{endpoint}/{id}`
///
/// A fresh credential is fetched from `C` for every delivery. The id is
/// always a single percent-encoded path segment.
pub struct HttpDeliveryClient<C> {
    http: reqwest::Client,
    endpoint: Url,
    credentials: C,
}

impl<C> HttpDeliveryClient<C> {
    /// Create a client for `endpoint`
    ///
    /// `timeout` bounds each request; `None` waits indefinitely.
    pub fn new(
        endpoint: impl AsRef<str>,
        credentials: C,
        timeout: Option<Duration>,
    ) -> Result<Self, DispatcherError> {
        let raw = endpoint.as_ref();
        let endpoint =
            Url::parse(raw).map_err(|e| DispatcherError::invalid_endpoint(raw, e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(DispatcherError::invalid_endpoint(raw, "cannot carry a path"));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DispatcherError::client_build(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            credentials,
        })
    }

    /// Create a client from relay configuration
    pub fn from_config(config: &RelayConfig, credentials: C) -> Result<Self, DispatcherError> {
        Self::new(
            &config.delivery_endpoint,
            credentials,
            config.delivery_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Target URL for one record
    pub fn record_url(&self, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        // `new` rejects cannot-be-a-base endpoints
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }
}

impl<C: CredentialProvider + Sync> DeliveryClient for HttpDeliveryClient<C> {
    #[instrument(name = "http_delivery", skip(self, record), fields(record_id = %record.id))]
    async fn deliver(&self, record: &Record) -> DeliveryOutcome {
        let api_key = self.credentials.fetch_credential().await;
        let started = Instant::now();

        let result = self
            .http
            .post(self.record_url(&record.id))
            .header(API_KEY_HEADER, api_key)
            .json(&DeliveryBody::from(record))
            .send()
            .await;

        let outcome = match result {
            Ok(response) if response.status() == StatusCode::OK => DeliveryOutcome::Delivered,
            Ok(response) => DeliveryOutcome::Rejected {
                status: response.status().as_u16(),
            },
            Err(e) => DeliveryOutcome::errored(e.to_string()),
        };

        record_delivery_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
        record_delivery_outcome(&outcome);

        match &outcome {
            DeliveryOutcome::Delivered => info!(record_id = %record.id, "POST request succeeded"),
            DeliveryOutcome::Rejected { status } => {
                warn!(record_id = %record.id, status = status, "POST request rejected")
            }
            DeliveryOutcome::Errored { cause } => {
                warn!(record_id = %record.id, error = %cause, "POST request error")
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use axum::{Json, Router};
    use providers::{MockCredentialProvider, StaticCredentialProvider};
    use serde_json::Value;

    #[derive(Debug, Clone)]
    struct Captured {
        id: String,
        api_key: Option<String>,
        content_type: Option<String>,
        body: Value,
    }

    type Requests = Arc<Mutex<Vec<Captured>>>;

    async fn capture(
        State(requests): State<Requests>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> AxumStatus {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        requests.lock().unwrap().push(Captured {
            id: id.clone(),
            api_key: header(API_KEY_HEADER),
            content_type: header("content-type"),
            body,
        });
        if id == "bad" {
            AxumStatus::INTERNAL_SERVER_ERROR
        } else if id == "created" {
            AxumStatus::CREATED
        } else {
            AxumStatus::OK
        }
    }

    async fn start_server() -> (String, Requests) {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/records/:id", post(capture))
            .with_state(requests.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/records"), requests)
    }

    #[test]
    fn test_record_url_trims_trailing_slash() {
        let client = HttpDeliveryClient::new(
            "https://intake.example.com/",
            StaticCredentialProvider::default(),
            None,
        )
        .unwrap();
        assert_eq!(client.record_url("42").as_str(), "https://intake.example.com/42");
    }

    #[test]
    fn test_record_id_stays_one_path_segment() {
        let client = HttpDeliveryClient::new(
            "https://intake.example.com/records",
            StaticCredentialProvider::default(),
            None,
        )
        .unwrap();

        assert_eq!(
            client.record_url("../admin").as_str(),
            "https://intake.example.com/records/..%2Fadmin"
        );
        let url = client.record_url("a/b?c#d");
        assert_eq!(url.path(), "/records/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = HttpDeliveryClient::new("not a url", StaticCredentialProvider::default(), None)
            .err()
            .unwrap();
        assert!(matches!(err, DispatcherError::InvalidEndpoint { .. }), "got: {err}");

        let err = HttpDeliveryClient::new(
            "mailto:ops@example.com",
            StaticCredentialProvider::default(),
            None,
        )
        .err()
        .unwrap();
        assert!(matches!(err, DispatcherError::InvalidEndpoint { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn test_reserved_characters_in_id_reach_the_endpoint_intact() {
        let (endpoint, requests) = start_server().await;
        let client =
            HttpDeliveryClient::new(endpoint, StaticCredentialProvider::new("k"), None).unwrap();

        for id in ["a/b?c#d", "x y"] {
            let outcome = client.deliver(&Record::new(id, "n", "i")).await;
            assert_eq!(outcome, DeliveryOutcome::Delivered);
        }

        let ids: Vec<String> = requests.lock().unwrap().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["a/b?c#d", "x y"]);
    }

    #[test]
    fn test_body_field_names() {
        let record = Record::new("1", "Alice", "chess;go");
        let body = serde_json::to_value(DeliveryBody::from(&record)).unwrap();
        assert_eq!(body, serde_json::json!({ "Name": "Alice", "Interests": "chess;go" }));
    }

    #[tokio::test]
    async fn test_delivered_on_200() {
        let (endpoint, requests) = start_server().await;
        let client =
            HttpDeliveryClient::new(endpoint, StaticCredentialProvider::new("secret-key"), None)
                .unwrap();

        let outcome = client.deliver(&Record::new("1", "Alice", "chess")).await;
        assert_eq!(outcome, DeliveryOutcome::Delivered);

        let captured = requests.lock().unwrap().clone();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].id, "1");
        assert_eq!(captured[0].api_key.as_deref(), Some("secret-key"));
        assert_eq!(captured[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(captured[0].body["Name"], "Alice");
        assert_eq!(captured[0].body["Interests"], "chess");
    }

    #[tokio::test]
    async fn test_non_200_is_rejected() {
        let (endpoint, _requests) = start_server().await;
        let client =
            HttpDeliveryClient::new(endpoint, StaticCredentialProvider::new("k"), None).unwrap();

        let outcome = client.deliver(&Record::new("bad", "", "")).await;
        assert_eq!(outcome, DeliveryOutcome::Rejected { status: 500 });

        // Only 200 counts as success
        let outcome = client.deliver(&Record::new("created", "", "")).await;
        assert_eq!(outcome, DeliveryOutcome::Rejected { status: 201 });
    }

    #[tokio::test]
    async fn test_credential_failure_sends_empty_key() {
        let (endpoint, requests) = start_server().await;
        let credentials = MockCredentialProvider::failing();
        let calls = credentials.call_counter();
        let client = HttpDeliveryClient::new(endpoint, credentials, None).unwrap();

        let outcome = client.deliver(&Record::new("7", "", "")).await;
        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        let captured = requests.lock().unwrap().clone();
        assert_eq!(captured[0].api_key.as_deref(), Some(""));
        assert_eq!(captured[0].body["Name"], "");
    }

    #[tokio::test]
    async fn test_credential_fetched_per_delivery() {
        let (endpoint, _requests) = start_server().await;
        let credentials = MockCredentialProvider::new("k");
        let calls = credentials.call_counter();
        let client = HttpDeliveryClient::new(endpoint, credentials, None).unwrap();

        for id in ["1", "2", "3"] {
            client.deliver(&Record::new(id, "n", "i")).await;
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transport_fault_is_errored() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpDeliveryClient::new(
            format!("http://{addr}"),
            StaticCredentialProvider::new("k"),
            Some(Duration::from_secs(2)),
        )
        .unwrap();

        let outcome = client.deliver(&Record::new("1", "a", "b")).await;
        assert!(matches!(outcome, DeliveryOutcome::Errored { .. }), "got {outcome:?}");
    }
}
