//! Concurrency and thread safety tests for EventFlow

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use eventflow::{
    build_router, ingest, is_event_id, IngestConfig, MemorySink, RequestContext, ServerConfig,
    ServerState, ServiceTags, TimeRandomIdGenerator,
};
use serde_json::json;
use tower::ServiceExt;

fn tags() -> ServiceTags {
    ServiceTags {
        function_name: "EventIngestion".into(),
        stage: "test".into(),
        function_version: "1".into(),
    }
}

#[test]
fn concurrent_ingest_shared_generator() {
    let ids = Arc::new(TimeRandomIdGenerator);
    let cfg = Arc::new(IngestConfig::default());
    let tags = Arc::new(tags());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ids = Arc::clone(&ids);
            let cfg = Arc::clone(&cfg);
            let tags = Arc::clone(&tags);
            thread::spawn(move || {
                (0..250)
                    .map(|i| {
                        let payload = json!({
                            "eventType": "tick",
                            "source": format!("thread-{t}"),
                            "data": {"i": i}
                        });
                        let ctx = RequestContext::new(format!("req-{t}-{i}"), false);
                        ingest(Some(&payload), &ctx, &cfg, &tags, ids.as_ref())
                            .expect("valid payload should be accepted")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let events: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    assert_eq!(events.len(), 2000);
    let unique: HashSet<_> = events.iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(unique.len(), events.len(), "event ids must not collide");
    assert!(events.iter().all(|e| is_event_id(&e.event_id)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_single_cold_start() {
    let sink = Arc::new(MemorySink::new());
    let state = Arc::new(ServerState::new(ServerConfig::default()).with_sink(sink.clone()));

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let app = build_router(state.clone());
            tokio::spawn(async move {
                let request = Request::builder()
                    .method(Method::POST)
                    .uri("/events")
                    .body(Body::from(format!(r#"{{"eventType":"e{i}","source":"load"}}"#)))
                    .unwrap();
                app.oneshot(request).await.unwrap().status()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::ACCEPTED);
    }

    let events = sink.events();
    assert_eq!(events.len(), 32);
    assert_eq!(events.iter().filter(|e| e.metadata.cold_start).count(), 1);
    assert!(!state.cold_start.is_pending());

    let unique: HashSet<_> = events.iter().map(|e| e.event_id.clone()).collect();
    assert_eq!(unique.len(), 32);
}
