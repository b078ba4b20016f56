//! End-to-end tests for the validate → enrich pipeline without HTTP.

use eventflow::{
    ingest, validate, IngestConfig, IngestRejection, Priority, RequestContext,
    SequentialIdGenerator, ServiceTags,
};
use serde_json::{json, Value};

fn tags() -> ServiceTags {
    ServiceTags {
        function_name: "EventIngestion".into(),
        stage: "prod".into(),
        function_version: "7".into(),
    }
}

#[test]
fn accepted_event_carries_request_context() {
    let payload = json!({
        "eventType": "user.signup",
        "source": "mobile",
        "priority": "high",
        "data": {"plan": "pro", "seats": 3}
    });
    let ctx = RequestContext::new("req-abc", true);
    let ids = SequentialIdGenerator::new();

    let event = ingest(Some(&payload), &ctx, &IngestConfig::default(), &tags(), &ids).unwrap();

    assert_eq!(event.event_id, "evt_seq_00000001");
    assert_eq!(event.ingestion_request_id, "req-abc");
    assert_eq!(event.event_type, "user.signup");
    assert_eq!(event.source, "mobile");
    assert_eq!(event.priority, Priority::High);
    assert_eq!(Value::Object(event.data.clone()), json!({"plan": "pro", "seats": 3}));
    assert_eq!(event.metadata.stage, "prod");
    assert_eq!(event.metadata.function_version, "7");
    assert!(event.metadata.cold_start);
}

#[test]
fn enriched_event_serializes_camel_case() {
    let payload = json!({"eventType": "a", "source": "s"});
    let ctx = RequestContext::new("req-1", false);
    let event = ingest(
        Some(&payload),
        &ctx,
        &IngestConfig::default(),
        &tags(),
        &SequentialIdGenerator::new(),
    )
    .unwrap();

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["priority"], "normal");
    assert_eq!(value["data"], json!({}));
    assert_eq!(value["ingestionRequestId"], "req-1");
    assert!(value["receivedAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(value["metadata"]["coldStart"], false);
    assert!(value["metadata"]["processingTimeMs"].is_u64());
}

#[test]
fn rejection_lists_every_violation() {
    let payload = json!({"eventType": 5, "priority": "LOW"});
    let ctx = RequestContext::new("req-2", false);
    let ids = SequentialIdGenerator::new();

    let err = ingest(Some(&payload), &ctx, &IngestConfig::default(), &tags(), &ids).unwrap_err();

    match err {
        IngestRejection::Invalid(errors) => assert_eq!(
            errors,
            vec![
                "eventType must be a string",
                "source is required",
                "priority must be one of: low, normal, high, critical",
            ]
        ),
        other => panic!("expected validation rejection, got {other:?}"),
    }
}

#[test]
fn validation_is_deterministic() {
    let cfg = IngestConfig::default();
    let payload = json!({"eventType": "", "source": "s", "data": "x"});

    let first = validate(Some(&payload), &cfg);
    let second = validate(Some(&payload), &cfg);
    assert_eq!(first, second);
    assert!(!first.is_valid());
}

#[test]
fn custom_limits_apply() {
    let cfg = IngestConfig {
        max_event_type_length: 5,
        max_source_length: Some(3),
        max_data_bytes: Some(8),
    };
    let payload = json!({"eventType": "toolong", "source": "abcd", "data": {"key": "value"}});

    let result = validate(Some(&payload), &cfg);
    assert_eq!(
        result.errors(),
        [
            "eventType must be between 1 and 5 characters",
            "source must be at most 3 characters",
            "data must not exceed 8 bytes",
        ]
    );
}
