use async_trait::async_trait;
use fcd_stream::application::{StreamSettings, TraceStreamService};
use fcd_stream::domains::agents::EntityCoverage;
use fcd_stream::domains::agents::{AgentPublisher, PublishAck};
use fcd_stream::domains::logger::DomainLogger;
use fcd_stream::domains::trace::{EntityRecord, Timestep, Trace};
use fcd_stream::{TransportError, TransportResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn debug(&self, msg: &str) { self.messages.lock().unwrap().push(format!("DEBUG:{}", msg)); }
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

struct Unreachable;

#[async_trait]
impl AgentPublisher for Unreachable {
    async fn publish(&self, _channel: &str, _payload: Vec<u8>) -> TransportResult<PublishAck> {
        Err(TransportError::NotConnected("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_stream_logs_progress_and_failures() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = capture.clone() as Arc<dyn DomainLogger>;
    let trace = Trace::new(vec![
        Timestep::new(0.0).with_vehicles(vec![
            EntityRecord::vehicle("f1", 0.0, 0.0),
            EntityRecord::vehicle("car7", 0.0, 0.0),
        ]),
        Timestep::new(1.0).with_vehicles(vec![EntityRecord::vehicle("bus2", 0.0, 0.0)]),
    ]);
    let (_tx, rx) = watch::channel(false);

    let service = TraceStreamService::new(
        Arc::new(Unreachable),
        logger,
        StreamSettings::new("Agents", Duration::ZERO),
    );
    let report = service.run(&trace, rx).await;
    assert_eq!(report.failed(), 2);

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m == "INFO:Len 2"));
    assert!(msgs.iter().any(|m| m == "INFO:Agents: 2 2"));
    assert!(msgs.iter().any(|m| m == "INFO:Agents: 3 1"));
    assert_eq!(msgs.iter().filter(|m| m.starts_with("WARN:Connection failure")).count(), 2);
    assert!(msgs.iter().any(|m| m.starts_with("DEBUG:") && m.contains("car7")));
    assert!(!msgs.iter().any(|m| m.starts_with("DEBUG:") && m.contains("bus2")));
}

#[tokio::test]
async fn test_unclassified_person_labels_are_logged_when_persons_are_covered() {
    let trace = Trace::new(vec![Timestep::new(0.0)
        .with_vehicles(vec![EntityRecord::vehicle("f1", 0.0, 0.0)])
        .with_persons(vec![EntityRecord::person("ped0", 1.0, 1.0)])]);

    for (coverage, expect_logged) in [
        (EntityCoverage::VehiclesOnly, false),
        (EntityCoverage::VehiclesAndPersons, true),
    ] {
        let capture = Arc::new(BridgeCapture::new());
        let (_tx, rx) = watch::channel(false);
        let service = TraceStreamService::new(
            Arc::new(Unreachable),
            capture.clone() as Arc<dyn DomainLogger>,
            StreamSettings::new("Agents", Duration::ZERO).with_coverage(coverage),
        );
        service.run(&trace, rx).await;

        let msgs = capture.messages.lock().unwrap();
        let logged = msgs.iter().any(|m| m.starts_with("DEBUG:") && m.contains("ped0"));
        assert_eq!(logged, expect_logged, "coverage {coverage:?}");
    }
}

#[test]
fn test_silent_and_tracing_loggers_accept_calls() {
    let silent = fcd_stream::adapters::outbound::init_silent_logger();
    silent.info("ignored");
    silent.error("ignored-err");

    let bridged = fcd_stream::adapters::outbound::init_tracing_logger();
    bridged.debug("no subscriber installed");
    bridged.warn("still fine");
}
