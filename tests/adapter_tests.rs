use fcd_stream::adapters::inbound::TraceFile;
use fcd_stream::adapters::outbound::{init_silent_logger, DryRunPublisher};
use fcd_stream::domains::agents::{AgentPublisher, NodeRegistration, OutboundBatch};
use fcd_stream::domains::trace::TraceSource;
use fcd_stream::{Config, TraceError};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn test_trace_file_loads_whole_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output.xml");
    fs::write(
        &path,
        r#"<fcd-export>
    <timestep time="0.00"><vehicle id="f1" x="1" y="2"/></timestep>
    <timestep time="1.00"><vehicle id="f1" x="2" y="2"/><vehicle id="bus.4" x="9" y="9"/></timestep>
</fcd-export>"#,
    )
    .unwrap();

    let source = TraceFile::new(&path);
    let trace = source.load_trace().await.unwrap();

    assert_eq!(source.path(), path.as_path());
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.vehicle_count(), 3);
}

#[tokio::test]
async fn test_trace_file_missing_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.xml");

    match TraceFile::new(&path).load_trace().await {
        Err(TraceError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_trace_file_with_unknown_element_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.xml");
    fs::write(&path, r#"<fcd-export><edge id="e0"/></fcd-export>"#).unwrap();

    let err = TraceFile::new(&path).load_trace().await.unwrap_err();
    assert!(matches!(err, TraceError::UnexpectedElement { .. }));
}

#[tokio::test]
async fn test_sample_trace_resource_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/traces/sample_fcd.xml");
    let trace = TraceFile::new(path).load_trace().await.unwrap();

    assert_eq!(trace.len(), 3);
    assert_eq!(trace.vehicle_count(), 5);
    assert_eq!(trace.person_count(), 1);
    assert_eq!(trace.timesteps()[0].vehicles[1].signals, 8);
}

#[tokio::test]
async fn test_dry_run_publisher_acknowledges_in_order() {
    let publisher = DryRunPublisher::new("SumoFCD", init_silent_logger());
    let payload = OutboundBatch::new().encode();

    let first = publisher.publish("Agents", payload.clone()).await.unwrap();
    let second = publisher.publish("Agents", payload).await.unwrap();

    assert_eq!(first.offset, 0);
    assert_eq!(second.offset, 1);
    assert_eq!(publisher.node_name(), "SumoFCD");
    assert!(publisher.deregister().await.is_ok());
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.discovery.endpoint, "127.0.0.1:9990");
    assert_eq!(config.discovery.node_name, "SumoFCD");
    assert_eq!(config.stream.delay_ms, 50);
    assert_eq!(config.interval(), Duration::from_millis(50));
    assert_eq!(config.stream.channel, "Agents");
    assert!(!config.stream.include_persons);
    assert_eq!(config.input.path, PathBuf::from("output.xml"));
    assert_eq!(config.logging.filter, "info");
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fcd.toml");
    fs::write(
        &path,
        r#"
[discovery]
endpoint = "broker.local:9092"

[stream]
delay_ms = 10
include_persons = true

[input]
path = "traces/run1.xml"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path())).unwrap();
    assert_eq!(config.discovery.endpoint, "broker.local:9092");
    assert_eq!(config.discovery.node_name, "SumoFCD");
    assert_eq!(config.stream.delay_ms, 10);
    assert!(config.stream.include_persons);
    assert_eq!(config.stream.channel, "Agents");
    assert_eq!(config.input.path, PathBuf::from("traces/run1.xml"));
}

#[test]
fn test_config_explicit_file_must_exist() {
    let dir = tempdir().unwrap();
    assert!(Config::load(Some(dir.path().join("nope.toml").as_path())).is_err());
}

#[test]
fn test_config_renders_as_toml() {
    let rendered = Config::default().to_toml().unwrap();
    assert!(rendered.contains("[discovery]"));
    assert!(rendered.contains("endpoint = \"127.0.0.1:9990\""));
    assert!(rendered.contains("delay_ms = 50"));

    let back: Config = toml::from_str(&rendered).unwrap();
    assert_eq!(back, Config::default());
}
