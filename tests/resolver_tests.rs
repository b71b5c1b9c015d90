// tests/resolver_tests.rs

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use quizdesk::{
    client::{Body, Candidates, Category, ClientConfig, ResolveError, Resolver, Resource},
    config::Config,
    models::submission::{Answer, SubmitRequest},
    routes,
    state::AppState,
};
use serde_json::{Value, json};

/// What a stub answers with on its one live path.
#[derive(Clone)]
enum Reply {
    Json(Value),
    Text(&'static str),
}

/// A tiny server that answers on exactly one path while `healthy`,
/// returns 503 for everything else, and counts every request it sees.
#[derive(Clone)]
struct Stub {
    hits: Arc<AtomicUsize>,
    healthy: Arc<AtomicBool>,
    path: &'static str,
    reply: Reply,
}

impl Stub {
    fn new(path: &'static str, reply: Reply) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            healthy: Arc::new(AtomicBool::new(true)),
            path,
            reply,
        }
    }

    fn dead() -> Self {
        let stub = Self::new("/never", Reply::Text(""));
        stub.healthy.store(false, Ordering::SeqCst);
        stub
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

async fn stub_handler(State(stub): State<Stub>, uri: Uri) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    if !stub.healthy.load(Ordering::SeqCst) || uri.path() != stub.path {
        return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
    }
    match &stub.reply {
        Reply::Json(value) => Json(value.clone()).into_response(),
        Reply::Text(text) => (*text).into_response(),
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

async fn spawn_stub(stub: &Stub) -> String {
    serve(Router::new().fallback(stub_handler).with_state(stub.clone())).await
}

/// Base URL with nothing listening behind it.
fn closed_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn resolver(bases: &[String]) -> Resolver {
    Resolver::with_client(reqwest::Client::new(), Candidates::from_bases(bases))
}

fn questions_json() -> Value {
    json!([{ "id": 1, "question": "2+2?", "options": ["3", "4", "5"] }])
}

fn record_json() -> Value {
    json!({
        "id": "5f0c6a4e-8d0e-4a8a-9a55-0d6f2c1f3b7e",
        "name": "anonymous",
        "email": "",
        "score": 0,
        "total": 1,
        "details": [{ "id": 1, "chosen": null, "correct": 1, "isCorrect": false }],
        "submittedAt": "2026-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn stops_at_first_live_candidate_and_caches_it() {
    let dead = [Stub::dead(), Stub::dead()];
    let live = Stub::new("/questions", Reply::Json(questions_json()));
    let after = Stub::dead();

    let bases = vec![
        spawn_stub(&dead[0]).await,
        spawn_stub(&dead[1]).await,
        spawn_stub(&live).await,
        spawn_stub(&after).await,
    ];
    let mut resolver = resolver(&bases);

    let questions = resolver.questions().await.unwrap();

    assert_eq!(questions.len(), 1);
    // bare and /api variant for each dead base before the live one
    assert_eq!(dead[0].hits(), 2);
    assert_eq!(dead[1].hits(), 2);
    assert_eq!(live.hits(), 1);
    assert_eq!(after.hits(), 0);
    assert_eq!(resolver.state().get(Category::Questions), Some(bases[2].as_str()));
    assert_eq!(resolver.state().get(Category::Scores), None);
}

#[tokio::test]
async fn cached_base_is_reused_without_probing_others() {
    let dead = Stub::dead();
    let live = Stub::new("/questions", Reply::Json(questions_json()));
    let bases = vec![spawn_stub(&dead).await, spawn_stub(&live).await];
    let mut resolver = resolver(&bases);

    resolver.questions().await.unwrap();
    resolver.questions().await.unwrap();
    resolver.questions().await.unwrap();

    assert_eq!(dead.hits(), 2);
    assert_eq!(live.hits(), 3);
}

#[tokio::test]
async fn api_prefixed_variant_caches_bare_base() {
    let proxied = Stub::new("/api/questions", Reply::Json(questions_json()));
    let bases = vec![closed_base(), spawn_stub(&proxied).await];
    let mut resolver = resolver(&bases);

    resolver.questions().await.unwrap();

    assert_eq!(proxied.hits(), 2);
    assert_eq!(resolver.state().get(Category::Questions), Some(bases[1].as_str()));
}

#[tokio::test]
async fn failing_cached_base_falls_back_to_discovery() {
    let first = Stub::new("/questions", Reply::Json(questions_json()));
    let second = Stub::new("/questions", Reply::Json(questions_json()));
    let bases = vec![spawn_stub(&first).await, spawn_stub(&second).await];
    let mut resolver = resolver(&bases);

    resolver.questions().await.unwrap();
    assert_eq!(resolver.state().get(Category::Questions), Some(bases[0].as_str()));

    first.set_healthy(false);
    let questions = resolver.questions().await.unwrap();

    assert_eq!(questions.len(), 1);
    // fast path, then bare and /api during discovery
    assert_eq!(first.hits(), 1 + 3);
    assert_eq!(second.hits(), 1);
    assert_eq!(resolver.state().get(Category::Questions), Some(bases[1].as_str()));
}

#[tokio::test]
async fn exhausted_discovery_lists_every_url_and_caches_nothing() {
    let dead = Stub::dead();
    let bases = vec![closed_base(), spawn_stub(&dead).await];
    let mut resolver = resolver(&bases);

    let err = resolver
        .fetch(&Resource::Questions, None)
        .await
        .unwrap_err();

    match err {
        ResolveError::Exhausted { attempted, .. } => assert_eq!(
            attempted,
            vec![
                format!("{}/questions", bases[0]),
                format!("{}/api/questions", bases[0]),
                format!("{}/questions", bases[1]),
                format!("{}/api/questions", bases[1]),
            ]
        ),
        other => panic!("expected Exhausted, got {:?}", other),
    }
    assert_eq!(resolver.state().get(Category::Questions), None);
}

#[tokio::test]
async fn hung_candidate_is_abandoned_after_probe_timeout() {
    async fn hang() -> &'static str {
        tokio::time::sleep(Duration::from_secs(30)).await;
        "too late"
    }

    let hung = serve(Router::new().fallback(hang)).await;
    let live = Stub::new("/questions", Reply::Json(questions_json()));
    let live_base = spawn_stub(&live).await;

    let mut resolver = Resolver::new(&ClientConfig {
        remote_base: hung.clone(),
        extra_bases: vec![live_base.clone()],
        local_bases: Vec::new(),
        probe_timeout: Duration::from_millis(200),
        ..ClientConfig::default()
    })
    .unwrap();
    assert_eq!(resolver.candidates().bases(), [hung, live_base.clone()]);

    let started = Instant::now();
    let questions = resolver.questions().await.unwrap();

    assert_eq!(questions.len(), 1);
    // two timed-out probes on the hung host, nowhere near its 30 s sleep
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(live.hits(), 1);
    assert_eq!(resolver.state().get(Category::Questions), Some(live_base.as_str()));
}

#[tokio::test]
async fn plain_text_success_is_accepted() {
    let text = Stub::new("/questions", Reply::Text("service is up"));
    let bases = vec![spawn_stub(&text).await];
    let mut resolver = resolver(&bases);

    let body = resolver.fetch(&Resource::Questions, None).await.unwrap();

    assert_eq!(body, Body::Text("service is up".to_string()));
    assert_eq!(resolver.state().get(Category::Questions), Some(bases[0].as_str()));
}

#[tokio::test]
async fn token_is_sent_as_key_parameter() {
    #[derive(serde::Deserialize)]
    struct KeyParams {
        key: Option<String>,
    }

    async fn scores(Query(params): Query<KeyParams>) -> Response {
        if params.key.as_deref() == Some("s3cret") {
            Json(json!([])).into_response()
        } else {
            StatusCode::FORBIDDEN.into_response()
        }
    }

    let base = serve(Router::new().route("/scores", axum::routing::get(scores))).await;

    let mut wrong = resolver(&[base.clone()]);
    assert!(wrong.scores("nope", 0, 0).await.is_err());
    assert_eq!(wrong.state().get(Category::Scores), None);

    let mut right = resolver(&[base.clone()]);
    let scores = right.scores("s3cret", 0, 0).await.unwrap();
    assert_eq!(scores.total(), 0);
    assert_eq!(right.state().get(Category::Scores), Some(base.as_str()));
    assert_eq!(right.state().get(Category::Questions), None);
}

#[tokio::test]
async fn submit_posts_once_per_host_without_api_variant() {
    let dead = Stub::dead();
    let live = Stub::new("/submit", Reply::Json(record_json()));
    let bases = vec![spawn_stub(&dead).await, spawn_stub(&live).await];
    let mut resolver = resolver(&bases);

    let record = resolver
        .submit(&SubmitRequest {
            answers: vec![Answer {
                id: 1.into(),
                choice_index: None,
            }],
            ..SubmitRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(record.total, 1);
    assert_eq!(dead.hits(), 1);
    assert_eq!(live.hits(), 1);
    assert_eq!(resolver.state().get(Category::Questions), Some(bases[1].as_str()));
}

#[tokio::test]
async fn submit_prefers_cached_questions_base() {
    let first = Stub::dead();
    let live = Stub::new("/questions", Reply::Json(questions_json()));
    let bases = vec![spawn_stub(&first).await, spawn_stub(&live).await];
    let mut resolver = resolver(&bases);

    resolver.questions().await.unwrap();
    let first_hits = first.hits();

    // The live stub only answers /questions, so the POST fails there and
    // falls back through the candidate list, skipping the cached base.
    let err = resolver.submit(&SubmitRequest::default()).await.unwrap_err();

    match err {
        ResolveError::Exhausted { attempted, .. } => assert_eq!(
            attempted,
            vec![format!("{}/submit", bases[1]), format!("{}/submit", bases[0])]
        ),
        other => panic!("expected Exhausted, got {:?}", other),
    }
    assert_eq!(first.hits(), first_hits + 1);
    assert_eq!(resolver.state().get(Category::Questions), None);
}

#[tokio::test]
async fn full_round_trip_against_the_server() {
    let dir = std::env::temp_dir().join(format!("quizdesk-e2e-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("questions.json"),
        json!([{ "id": 1, "question": "2+2?", "options": ["3", "4", "5"], "correctIndex": 1 }])
            .to_string(),
    )
    .unwrap();

    let state = AppState::new(Config {
        port: 0,
        cors_origin: "*".to_string(),
        questions_file_path: dir.join("questions.json"),
        scores_file_path: dir.join("scores.json"),
        scores_key: Some("s3cret".to_string()),
        rust_log: "error".to_string(),
        log_dir: dir.join("logs").display().to_string(),
    });
    state.scores.ensure_exists().await.unwrap();
    let server = serve(routes::create_router(state)).await;

    let mut resolver = resolver(&[closed_base(), server.clone()]);

    let questions = resolver.questions().await.unwrap();
    assert_eq!(questions[0].options, vec!["3", "4", "5"]);

    let record = resolver
        .submit(&SubmitRequest {
            name: Some("Ada".to_string()),
            email: None,
            answers: vec![Answer {
                id: questions[0].id.clone(),
                choice_index: Some(1),
            }],
        })
        .await
        .unwrap();
    assert_eq!((record.score, record.total), (1, 1));

    let scores = resolver.scores("s3cret", 10, 0).await.unwrap();
    assert_eq!(scores.total(), 1);
    assert_eq!(scores.items()[0].id, record.id);
    assert_eq!(resolver.state().get(Category::Scores), Some(server.as_str()));
}
