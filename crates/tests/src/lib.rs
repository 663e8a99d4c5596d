//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 本地 HTTP 端点上的 e2e 测试（无需 AWS）

#[cfg(test)]
mod contract_tests {
    use contracts::{DeliveryOutcome, TriggerEvent};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_outcome_serialization_is_stable() {
        let json = serde_json::to_value(DeliveryOutcome::Rejected { status: 429 }).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "rejected", "status": 429 }));
    }

    #[test]
    fn test_trigger_event_shape() {
        let event = TriggerEvent::from_json(
            r#"{ "Records": [ { "s3": { "bucket": { "name": "uploads" }, "object": { "key": "in/records.csv" } } } ] }"#,
        )
        .unwrap();
        let object = event.first_object().unwrap();
        assert_eq!(object.bucket, "uploads");
        assert_eq!(object.key, "in/records.csv");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::RelayConfig;
    use dispatcher::{
        BatchDispatcher, DispatchState, DispatcherConfig, DispatcherError, HttpDeliveryClient,
    };
    use ingestion::FileRecordSource;
    use providers::{
        CachedCredentialProvider, MockCredentialConfig, MockCredentialProvider, MockLagMonitor,
        StaticCredentialProvider,
    };
    use serde_json::Value;
    use tokio::net::TcpListener;

    /// One request as seen by the endpoint
    #[derive(Debug, Clone)]
    struct Received {
        id: String,
        api_key: String,
        body: Value,
    }

    #[derive(Clone, Default)]
    struct Endpoint {
        received: Arc<Mutex<Vec<Received>>>,
        reject_ids: Arc<Vec<String>>,
    }

    impl Endpoint {
        fn received(&self) -> Vec<Received> {
            self.received.lock().unwrap().clone()
        }

        fn ids(&self) -> Vec<String> {
            self.received().into_iter().map(|r| r.id).collect()
        }
    }

    async fn receive(
        State(endpoint): State<Endpoint>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<missing>")
            .to_string();
        endpoint.received.lock().unwrap().push(Received {
            id: id.clone(),
            api_key,
            body,
        });

        if endpoint.reject_ids.contains(&id) {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        }
    }

    /// Start a local intake endpoint on an ephemeral port
    async fn start_endpoint(reject_ids: &[&str]) -> (String, Endpoint) {
        let endpoint = Endpoint {
            received: Arc::default(),
            reject_ids: Arc::new(reject_ids.iter().map(|s| s.to_string()).collect()),
        };
        let app = Router::new()
            .route("/intake/:id", post(receive))
            .with_state(endpoint.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/intake"), endpoint)
    }

    fn record_file(count: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for i in 0..count {
            writeln!(file, "{i},user-{i},topic-{i}").unwrap();
        }
        file
    }

    fn config_for(endpoint: &str, extra: &str) -> RelayConfig {
        let content = format!(
            "consumer_function_name = \"record-consumer\"\n\
             secret_name = \"delivery-api-key\"\n\
             delivery_endpoint = \"{endpoint}\"\n\
             delivery_timeout_ms = 5000\n\
             {extra}"
        );
        ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap()
    }

    /// End-to-end test: file -> dispatcher -> HTTP endpoint
    ///
    /// 验证完整的数据流：
    /// 1. FileRecordSource 读取并解析记录
    /// 2. BatchDispatcher 按批次投递
    /// 3. 本地端点按文件顺序收到每条记录
    #[tokio::test]
    async fn test_e2e_file_to_endpoint() {
        let (url, endpoint) = start_endpoint(&[]).await;
        let config = config_for(&url, "");
        let file = record_file(25);

        let delivery =
            HttpDeliveryClient::from_config(&config, StaticCredentialProvider::new("secret-key"))
                .unwrap();
        let lag = MockLagMonitor::constant(0.0);
        let lag_calls = lag.call_counter();
        let mut dispatcher = BatchDispatcher::new(DispatcherConfig::from(&config), delivery, lag);

        let report = dispatcher
            .run(&FileRecordSource::new(file.path()))
            .await
            .unwrap();

        assert_eq!(report.total_records, 25);
        assert_eq!(report.counts.batches, 3);
        assert_eq!(report.counts.delivered, 25);
        assert_eq!(report.counts.throttle_pauses, 0);
        assert_eq!(lag_calls.load(std::sync::atomic::Ordering::SeqCst), 3);
        assert_eq!(dispatcher.state(), DispatchState::Done);
        assert_eq!(report.completion_message(), "Processing completed.");

        let received = endpoint.received();
        let expected: Vec<String> = (0..25).map(|i| i.to_string()).collect();
        assert_eq!(endpoint.ids(), expected);
        assert!(received.iter().all(|r| r.api_key == "secret-key"));
        assert_eq!(received[3].body, serde_json::json!({ "Name": "user-3", "Interests": "topic-3" }));
    }

    #[tokio::test]
    async fn test_e2e_rejections_continue() {
        let (url, endpoint) = start_endpoint(&["2", "11"]).await;
        let config = config_for(&url, "batch_size = 4\n");
        let file = record_file(12);

        let delivery =
            HttpDeliveryClient::from_config(&config, StaticCredentialProvider::new("k")).unwrap();
        let mut dispatcher = BatchDispatcher::new(
            DispatcherConfig::from(&config),
            delivery,
            MockLagMonitor::constant(0.0),
        );

        let report = dispatcher
            .run(&FileRecordSource::new(file.path()))
            .await
            .unwrap();

        assert_eq!(endpoint.received().len(), 12);
        assert_eq!(report.counts.batches, 3);
        assert_eq!(report.counts.delivered, 10);
        assert_eq!(report.counts.rejected, 2);
        assert_eq!(report.counts.errored, 0);
    }

    #[tokio::test]
    async fn test_e2e_lag_pauses_between_batches() {
        let (url, endpoint) = start_endpoint(&[]).await;
        let config = config_for(&url, "batch_size = 5\nbatch_delay_ms = 150\n");
        let file = record_file(15);

        let delivery =
            HttpDeliveryClient::from_config(&config, StaticCredentialProvider::new("k")).unwrap();
        // Only the reading after the first batch is over the threshold; the
        // second query fails and counts as zero
        let lag = MockLagMonitor::scripted([Some(1500.0), None, Some(999.0)], 0.0);
        let mut dispatcher = BatchDispatcher::new(DispatcherConfig::from(&config), delivery, lag);

        let started = Instant::now();
        let report = dispatcher
            .run(&FileRecordSource::new(file.path()))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(150));
        assert_eq!(report.counts.throttle_pauses, 1);
        assert_eq!(report.total_paused(), Duration::from_millis(150));
        assert_eq!(report.counts.lag_queries, 3);
        assert_eq!(report.lag.over_threshold, 1);
        assert_eq!(endpoint.received().len(), 15);
    }

    #[tokio::test]
    async fn test_e2e_credential_failure_then_cached() {
        let (url, endpoint) = start_endpoint(&[]).await;
        let config = config_for(&url, "cache_credential = true\n");
        let file = record_file(4);

        let credentials = MockCredentialProvider::with_config(MockCredentialConfig {
            credential: "rotated-key".into(),
            fail_first: 1,
        });
        let calls = credentials.call_counter();
        let delivery =
            HttpDeliveryClient::from_config(&config, CachedCredentialProvider::new(credentials))
                .unwrap();
        let mut dispatcher = BatchDispatcher::new(
            DispatcherConfig::from(&config),
            delivery,
            MockLagMonitor::failing(),
        );

        let report = dispatcher
            .run(&FileRecordSource::new(file.path()))
            .await
            .unwrap();

        // The first delivery goes out with an empty key; the rest reuse the
        // cached one
        let keys: Vec<String> = endpoint.received().into_iter().map(|r| r.api_key).collect();
        assert_eq!(keys, vec!["", "rotated-key", "rotated-key", "rotated-key"]);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(report.counts.delivered, 4);
        assert_eq!(report.counts.throttle_pauses, 0);
    }

    #[tokio::test]
    async fn test_e2e_env_config_and_sparse_lines() {
        let (url, endpoint) = start_endpoint(&[]).await;
        let config = ConfigLoader::from_vars([
            ("DELIVERY_ENDPOINT", url.as_str()),
            ("BATCH_SIZE", "2"),
            ("ITERATOR_AGE_THRESHOLD", "500"),
        ])
        .unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"7,,\r\n\r\n8,Bob\n9,Carol,chess,go\n").unwrap();

        let delivery =
            HttpDeliveryClient::from_config(&config, StaticCredentialProvider::default()).unwrap();
        let mut dispatcher = BatchDispatcher::new(
            DispatcherConfig::from(&config),
            delivery,
            MockLagMonitor::constant(0.0),
        );

        let report = dispatcher
            .run(&FileRecordSource::new(file.path()))
            .await
            .unwrap();

        assert_eq!(report.total_records, 3);
        assert_eq!(report.counts.batches, 2);

        let received = endpoint.received();
        assert_eq!(endpoint.ids(), vec!["7", "8", "9"]);
        assert_eq!(received[0].body, serde_json::json!({ "Name": "", "Interests": "" }));
        assert_eq!(received[1].body, serde_json::json!({ "Name": "Bob", "Interests": "" }));
        assert_eq!(received[2].body, serde_json::json!({ "Name": "Carol", "Interests": "chess" }));
        assert!(received.iter().all(|r| r.api_key.is_empty()));
    }

    #[tokio::test]
    async fn test_e2e_missing_file_fails_without_deliveries() {
        let (url, endpoint) = start_endpoint(&[]).await;
        let config = config_for(&url, "");

        let delivery =
            HttpDeliveryClient::from_config(&config, StaticCredentialProvider::new("k")).unwrap();
        let lag = MockLagMonitor::constant(0.0);
        let lag_calls = lag.call_counter();
        let mut dispatcher = BatchDispatcher::new(DispatcherConfig::from(&config), delivery, lag);

        let err = dispatcher
            .run(&FileRecordSource::new("/nonexistent/records.csv"))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatcherError::Source(_)));
        assert!(endpoint.received().is_empty());
        assert_eq!(lag_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
