use nepali_sms::{AppConfig, GatewayManager, SmsConfig};
use serde_json::json;
use sms_core::{ErrorKind, GatewayConfig, SendOptions};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One manager send log: level, message and the remaining fields.
#[derive(Clone, Debug)]
struct LogRecord {
    level: Level,
    message: String,
    fields: BTreeMap<String, String>,
}

/// Records every manager send log.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<LogRecord>>>);

impl CapturedLogs {
    fn entries(&self) -> Vec<LogRecord> {
        self.0.lock().unwrap().clone()
    }

    fn records(&self) -> Vec<(Level, String)> {
        self.entries()
            .into_iter()
            .map(|record| (record.level, record.message))
            .collect()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() != "nepali_sms::manager" || *meta.level() > Level::INFO {
            return;
        }
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(LogRecord {
            level: *meta.level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(logs.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

fn sms_config(server: &MockServer) -> SmsConfig {
    SmsConfig::default()
        .with_gateway(
            "sparrow",
            GatewayConfig::new()
                .with("token", "test-token")
                .with("from", "TEST")
                .with("base_url", format!("{}/v2/sms/", server.uri()))
                .with("credit_url", format!("{}/v2/credit/", server.uri())),
        )
        .with_gateway(
            "akash",
            GatewayConfig::new()
                .with("auth_key", "akash-auth-key")
                .with("sender_id", "AKASHTEST")
                .with("base_url", format!("{}/akash/", server.uri())),
        )
        .with_gateway(
            "fast",
            GatewayConfig::new()
                .with("api_key", "fast-api-key")
                .with("sender", "FASTTEST")
                .with("base_url", format!("{}/fast/", server.uri())),
        )
}

async fn mount_all_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/sms/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response_code": 200, "response": "success"})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/credit/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 1000})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/akash/sms/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "success", "message_id": "123456"})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/akash/credit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 2000})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fast/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": true, "message_id": "abc123"})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fast/send-bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true, "messages": 2})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 1500})))
        .mount(server)
        .await;
}

fn numbers(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_send_with_default_gateway() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let manager = GatewayManager::new(sms_config(&server));

    let result = manager
        .send("9801234567", "Test message", &SendOptions::new(), None)
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.message, "SMS sent successfully");
    assert_eq!(manager.resolved_gateways(), ["sparrow"]);
}

#[tokio::test]
async fn test_send_with_specific_gateway() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let manager = GatewayManager::new(sms_config(&server));

    for gateway in ["akash", "fast"] {
        let result = manager
            .send("9801234567", "Test with gateway", &SendOptions::new(), Some(gateway))
            .await
            .unwrap();
        assert!(result.success, "{gateway} should succeed");
    }
}

#[tokio::test]
async fn test_check_balance_on_every_gateway() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let manager = GatewayManager::new(sms_config(&server));

    for (gateway, balance) in [("sparrow", 1000), ("akash", 2000), ("fast", 1500)] {
        let result = manager.check_balance(Some(gateway)).await.unwrap();
        assert!(result.success);
        assert_eq!(result.message, "Balance retrieved successfully");
        assert_eq!(result.data.unwrap()["balance"], balance);
    }
}

#[tokio::test]
async fn test_invalid_number_is_hard_failure_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let manager = GatewayManager::new(sms_config(&server).with_logging(true));
    let (logs, _guard) = capture_logs();

    let err = manager
        .send("9501234567", "hi", &SendOptions::new(), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidPhoneNumber);
    assert!(logs.records().is_empty());
}

#[tokio::test]
async fn test_validation_flag_off_lets_number_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/sms/"))
        .and(query_param("to", "123"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid receiver"))
        .expect(1)
        .mount(&server)
        .await;
    let manager = GatewayManager::new(sms_config(&server).with_phone_validation(false));

    let result = manager
        .send("123", "hi", &SendOptions::new(), None)
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("invalid receiver"));
}

#[tokio::test]
async fn test_sparrow_bulk_partial_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("to", "9809876543"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream busy"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/sms/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response_code": 200})))
        .mount(&server)
        .await;
    let manager = GatewayManager::new(sms_config(&server));

    let recipients = numbers(&["9801234567", "9809876543", "12", "9841234567"]);
    let result = manager
        .send_multiple(&recipients, "Bulk test", &SendOptions::new(), None)
        .await
        .unwrap();

    let bulk = result.as_bulk().expect("sparrow reports per recipient");
    assert_eq!(bulk.data.total, 4);
    assert_eq!(bulk.data.success, 2);
    assert_eq!(bulk.data.failed, 2);
    assert_eq!(bulk.data.success + bulk.data.failed, bulk.data.total);
    assert_eq!(bulk.success, bulk.data.failed == 0);
    assert_eq!(bulk.data.results.len(), recipients.len());
    assert!(bulk.result_for("9841234567").unwrap().success);
}

#[tokio::test]
async fn test_native_bulk_issues_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/akash/sms/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fast/send-bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": true})))
        .expect(1)
        .mount(&server)
        .await;
    let manager = GatewayManager::new(sms_config(&server));
    let recipients = numbers(&["9801234567", "9809876543", "9841234567", "9851234567"]);

    for gateway in ["akash", "fast"] {
        let result = manager
            .send_multiple(&recipients, "Bulk test", &SendOptions::new(), Some(gateway))
            .await
            .unwrap();
        let batched = result.as_batched().expect("native bulk returns one result");
        assert!(batched.success);
        assert_eq!(batched.message, "Bulk SMS sent successfully");
    }
}

#[tokio::test]
async fn test_logging_disabled_emits_nothing() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let manager = GatewayManager::new(sms_config(&server));
    let (logs, _guard) = capture_logs();

    manager
        .send("9801234567", "quiet", &SendOptions::new(), None)
        .await
        .unwrap();
    manager
        .send_multiple(&numbers(&["9801234567"]), "quiet", &SendOptions::new(), Some("fast"))
        .await
        .unwrap();

    assert!(logs.records().is_empty());
}

#[tokio::test]
async fn test_logging_enabled_one_record_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/akash/sms/send"))
        .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credit"))
        .mount(&server)
        .await;
    mount_all_ok(&server).await;
    let manager = GatewayManager::new(sms_config(&server).with_logging(true));
    let (logs, _guard) = capture_logs();

    manager
        .send("9801234567", "logged", &SendOptions::new(), None)
        .await
        .unwrap();
    manager
        .send("9801234567", "logged", &SendOptions::new(), Some("akash"))
        .await
        .unwrap();
    manager
        .send_multiple(
            &numbers(&["9801234567", "9809876543"]),
            "logged",
            &SendOptions::new(),
            None,
        )
        .await
        .unwrap();
    manager
        .send_multiple(
            &numbers(&["9801234567", "9809876543"]),
            "rejected",
            &SendOptions::new(),
            Some("akash"),
        )
        .await
        .unwrap();
    manager.check_balance(None).await.unwrap();

    assert_eq!(
        logs.records(),
        vec![
            (Level::INFO, "SMS sent".to_string()),
            (Level::ERROR, "SMS sent".to_string()),
            (Level::INFO, "Bulk SMS sent".to_string()),
            (Level::ERROR, "Bulk SMS sent".to_string()),
        ]
    );

    let entries = logs.entries();
    let single = &entries[1].fields;
    assert_eq!(single["gateway"], "akash");
    assert_eq!(single["to"], "9801234567");
    assert_eq!(single["text"], "logged");
    let result: serde_json::Value = serde_json::from_str(&single["result"]).unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["error"], "insufficient credit");
    assert_eq!(result["message"], "Failed to send SMS");

    let bulk = &entries[3].fields;
    assert_eq!(bulk["gateway"], "akash");
    assert_eq!(bulk["recipients"], "9801234567,9809876543");
    assert_eq!(bulk["text"], "rejected");
    let result: serde_json::Value = serde_json::from_str(&bulk["result"]).unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["message"], "Failed to send bulk SMS");

    let sequential = &entries[2].fields;
    assert_eq!(sequential["gateway"], "sparrow");
    let result: serde_json::Value = serde_json::from_str(&sequential["result"]).unwrap();
    assert_eq!(result["data"]["total"], 2);
    assert_eq!(result["data"]["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_and_unconfigured_gateways() {
    let config = SmsConfig::default().with_gateway(
        "sparrow",
        GatewayConfig::new().with("token", "t").with("from", "F"),
    );
    let manager = GatewayManager::new(config);

    let err = manager
        .send("9801234567", "hi", &SendOptions::new(), Some("unsupported"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedGateway);

    let err = manager.check_balance(Some("akash")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.to_string(), "SMS gateway [akash] is not properly configured.");
}

#[tokio::test]
async fn test_manager_from_toml_config() {
    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let config = AppConfig::from_toml_str(&format!(
        r#"
        [sms]
        default = "fast"

        [sms.gateways.fast]
        api_key = "fast-api-key"
        sender = "FASTTEST"
        base_url = "{}/fast/"
        "#,
        server.uri()
    ))
    .unwrap();
    let manager = GatewayManager::from_app_config(config);

    assert!(manager.validate_phone_number("+14155552671", None).unwrap());
    let result = manager
        .send("+14155552671", "hello", &SendOptions::new(), None)
        .await
        .unwrap();
    assert!(result.success);
}

#[tokio::test]
async fn test_concurrent_sends_share_one_client() {
    use futures::future;

    let server = MockServer::start().await;
    mount_all_ok(&server).await;
    let manager = Arc::new(GatewayManager::new(sms_config(&server)));

    let futures = (0..10).map(|i| {
        let manager = Arc::clone(&manager);
        async move {
            let gateway = if i % 2 == 0 { "akash" } else { "fast" };
            manager
                .send("9801234567", &format!("message {i}"), &SendOptions::new(), Some(gateway))
                .await
        }
    });

    let results = future::join_all(futures).await;

    assert_eq!(results.len(), 10);
    for result in results {
        assert!(result.unwrap().success);
    }
    assert_eq!(manager.resolved_gateways(), ["akash", "fast"]);
}
