//! Integration tests for theoryx-rs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use theoryx_rs::config::{ModelCatalog, ModelPair};
use theoryx_rs::error::LlmError;
use theoryx_rs::interaction::{LogSink, Outcome};
use theoryx_rs::llm::{ChatClient, ChatMessage, ChatOptions, Fragment, FragmentStream, ReasoningEffort};
use theoryx_rs::{ImageInput, Phase, SolveUpdate, Solver};

const SOLVER_HEADER: &str = "# solver-mini solving process";

/// Shared, ordered record of what the fake client was asked to do.
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: String) {
        self.0.lock().expect("journal lock").push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }
}

/// In-memory chat client with one scripted stream per model.
#[derive(Default)]
struct FakeClient {
    scripts: Mutex<HashMap<String, Vec<Result<Fragment, LlmError>>>>,
    refuse: HashSet<String>,
    requests: Mutex<Vec<(String, Vec<ChatMessage>, ChatOptions)>>,
    journal: Journal,
}

impl FakeClient {
    fn with_script(mut self, model: &str, items: Vec<Result<Fragment, LlmError>>) -> Self {
        self.scripts
            .get_mut()
            .expect("scripts lock")
            .insert(model.to_string(), items);
        self
    }

    fn with_text(self, model: &str, fragments: &[&str]) -> Self {
        let items = fragments.iter().map(|f| Ok(Fragment::content(*f))).collect();
        self.with_script(model, items)
    }

    fn refusing(mut self, model: &str) -> Self {
        self.refuse.insert(model.to_string());
        self
    }

    fn requests(&self) -> Vec<(String, Vec<ChatMessage>, ChatOptions)> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ChatClient for FakeClient {
    async fn stream_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<FragmentStream, LlmError> {
        self.journal.push(format!("open:{model}"));
        self.requests.lock().expect("requests lock").push((
            model.to_string(),
            messages.to_vec(),
            *options,
        ));

        if self.refuse.contains(model) {
            return Err(LlmError::Request("401 unauthorized".to_string()));
        }

        let items = self
            .scripts
            .lock()
            .expect("scripts lock")
            .remove(model)
            .unwrap_or_default();
        let journal = self.journal.clone();
        let model = model.to_string();
        Ok(stream::iter(items)
            .inspect(move |_| journal.push(format!("next:{model}")))
            .boxed())
    }
}

/// Sink that keeps every recorded interaction.
#[derive(Default)]
struct MemorySink(Mutex<Vec<(String, bool)>>);

impl MemorySink {
    fn records(&self) -> Vec<(String, bool)> {
        self.0.lock().expect("sink lock").clone()
    }
}

impl LogSink for MemorySink {
    fn record(&self, model: &str, _messages: &[ChatMessage], outcome: Outcome<'_>) -> String {
        self.0
            .lock()
            .expect("sink lock")
            .push((model.to_string(), outcome.is_error()));
        format!("log:{model}")
    }
}

fn catalog() -> ModelCatalog {
    ModelCatalog {
        simple: ModelPair::new("vision-mini", "solver-mini"),
        complex: ModelPair::new("vision-large", "o3-mini"),
    }
}

fn figure() -> ImageInput {
    ImageInput::from_bytes(vec![0x89, b'P', b'N', b'G'], "image/png")
}

async fn run(
    solver: &Solver<FakeClient, MemorySink>,
    problem: &str,
    image: Option<&ImageInput>,
    complex: bool,
) -> Vec<SolveUpdate> {
    solver.solve(problem, image, complex).collect().await
}

#[tokio::test]
async fn test_solve_without_image_streams_each_fragment() {
    let client = FakeClient::default().with_text("solver-mini", &["Step ", "1: ", "done"]);
    let solver = Solver::new(client, catalog(), MemorySink::default());

    let updates = run(&solver, "A mass on a spring.", None, false).await;

    assert_eq!(updates.len(), 5);
    assert_eq!(updates[0].phase, Phase::Started);
    assert_eq!(updates[0].document, "");
    assert_eq!(updates[0].log, "");

    let expected = [
        format!("{SOLVER_HEADER}\n\nStep "),
        format!("{SOLVER_HEADER}\n\nStep 1: "),
        format!("{SOLVER_HEADER}\n\nStep 1: done"),
    ];
    for (update, expected) in updates[1..4].iter().zip(&expected) {
        assert_eq!(update.phase, Phase::Solving);
        assert_eq!(&update.document, expected);
        assert!(update.log.is_empty());
    }

    let last = &updates[4];
    assert_eq!(last.phase, Phase::Done);
    assert_eq!(last.document, updates[3].document);
    assert_eq!(last.log, "log:solver-mini");
}

#[tokio::test]
async fn test_empty_solver_stream_fails_with_no_response() {
    let client = FakeClient::default().with_script("solver-mini", vec![Ok(Fragment::empty())]);
    let sink = MemorySink::default();
    let solver = Solver::new(client, catalog(), sink);

    let updates = run(&solver, "q", None, false).await;

    assert_eq!(updates[0].phase, Phase::Started);
    let after_start = &updates[1..];
    assert_eq!(after_start.len(), 1);
    let failure = &after_start[0];
    assert_eq!(failure.phase, Phase::Failed);
    assert!(failure.document.contains("no response"));
    assert!(failure.document.contains("# solver-mini solving error"));
    assert!(failure.log.is_empty());
}

#[tokio::test]
async fn test_image_stream_completes_before_solver_opens() {
    let client = FakeClient::default()
        .with_text("vision-mini", &["Two blocks", " on a pulley."])
        .with_text("solver-mini", &["Tension ", "T."]);
    let journal = client.journal.clone();
    let solver = Solver::new(client, catalog(), MemorySink::default());
    let image = figure();

    let updates = run(&solver, "Find the tension.", Some(&image), false).await;

    let entries = journal.entries();
    let solver_opened = entries
        .iter()
        .position(|e| e == "open:solver-mini")
        .expect("solver stream opened");
    let last_image_pull = entries
        .iter()
        .rposition(|e| e == "next:vision-mini")
        .expect("image stream consumed");
    assert_eq!(entries[0], "open:vision-mini");
    assert!(last_image_pull < solver_opened);
    assert!(!entries[..solver_opened].iter().any(|e| e == "next:solver-mini"));

    let phases: Vec<Phase> = updates.iter().map(|u| u.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Started,
            Phase::Describing,
            Phase::Describing,
            Phase::Solving,
            Phase::Solving,
            Phase::Done,
        ]
    );
    assert_eq!(
        updates[2].document,
        "# Image description\n\nTwo blocks on a pulley."
    );

    let done = updates.last().expect("terminal update");
    assert_eq!(
        done.document,
        format!("# Image description\n\nTwo blocks on a pulley.\n\n---\n\n\n\n{SOLVER_HEADER}\n\nTension T.")
    );
    assert_eq!(done.log, "log:vision-mini\n\nlog:solver-mini");

    let requests = solver.client().requests();
    let prompt = requests[1].1[1].content.text();
    assert!(prompt.contains("Find the tension."));
    assert!(prompt.contains("Two blocks on a pulley."));
}

#[tokio::test]
async fn test_image_failure_stops_the_request() {
    let client = FakeClient::default()
        .with_script("vision-mini", vec![])
        .with_text("solver-mini", &["never"]);
    let journal = client.journal.clone();
    let solver = Solver::new(client, catalog(), MemorySink::default());
    let image = figure();

    let updates = run(&solver, "q", Some(&image), false).await;

    assert_eq!(updates.len(), 2);
    let failure = &updates[1];
    assert_eq!(failure.phase, Phase::Failed);
    assert!(failure.document.starts_with("image processing failed"));
    assert!(failure.document.contains("no response"));
    assert_eq!(failure.log, "log:vision-mini");
    assert!(!journal.entries().iter().any(|e| e == "open:solver-mini"));
}

#[tokio::test]
async fn test_mid_stream_fault_keeps_partial_progress() {
    let client = FakeClient::default().with_script(
        "solver-mini",
        vec![
            Ok(Fragment::content("Step 1: equilibrium.")),
            Err(LlmError::Stream("connection reset".to_string())),
        ],
    );
    let solver = Solver::new(client, catalog(), MemorySink::default());

    let updates = run(&solver, "q", None, false).await;

    assert_eq!(updates.len(), 3);
    let failure = &updates[2];
    assert_eq!(failure.phase, Phase::Failed);
    let progress_at = failure.document.find("Step 1: equilibrium.").expect("progress kept");
    let error_at = failure
        .document
        .find("# solver-mini solving error")
        .expect("error block");
    assert!(progress_at < error_at);
    assert!(failure.document.contains("connection reset"));
    assert_eq!(solver.sink().records(), vec![("solver-mini".to_string(), true)]);
}

#[tokio::test]
async fn test_solver_fault_after_image_keeps_description_and_its_log() {
    let client = FakeClient::default()
        .with_text("vision-mini", &["Two blocks", " on a pulley."])
        .with_script(
            "solver-mini",
            vec![
                Ok(Fragment::content("Free body diagram.")),
                Err(LlmError::Stream("connection reset".to_string())),
            ],
        );
    let solver = Solver::new(client, catalog(), MemorySink::default());
    let image = figure();

    let updates = run(&solver, "Find the tension.", Some(&image), false).await;

    let phases: Vec<_> = updates.iter().map(|u| u.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Started,
            Phase::Describing,
            Phase::Describing,
            Phase::Solving,
            Phase::Failed,
        ]
    );

    let failure = updates.last().expect("terminal update");
    assert!(
        failure
            .document
            .starts_with("# Image description\n\nTwo blocks on a pulley.")
    );
    let progress_at = failure.document.find("Free body diagram.").expect("progress kept");
    let error_at = failure
        .document
        .find("# solver-mini solving error")
        .expect("error block");
    assert!(progress_at < error_at);
    assert!(
        failure
            .document
            .ends_with("model response failed: stream interrupted: connection reset")
    );

    assert_eq!(failure.log, "log:vision-mini");
    assert_eq!(
        solver.sink().records(),
        vec![
            ("vision-mini".to_string(), false),
            ("solver-mini".to_string(), true),
        ]
    );
}

#[tokio::test]
async fn test_refused_request_fails_without_fragments() {
    let client = FakeClient::default().refusing("solver-mini");
    let solver = Solver::new(client, catalog(), MemorySink::default());

    let updates = run(&solver, "q", None, false).await;

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].phase, Phase::Failed);
    assert!(updates[1].document.contains("401 unauthorized"));
}

#[tokio::test]
async fn test_formulas_are_converted_while_streaming() {
    let client = FakeClient::default().with_text(
        "solver-mini",
        &["Force \\(", " F ", "\\) and \\[ a", " = g \\]", " end"],
    );
    let solver = Solver::new(client, catalog(), MemorySink::default());

    let updates = run(&solver, "q", None, false).await;

    for update in &updates {
        assert!(!update.document.contains("\\("));
        assert!(!update.document.contains("\\["));
        assert_eq!(update.document.matches('$').count() % 2, 0);
    }
    assert_eq!(
        updates.last().expect("terminal update").document,
        format!("{SOLVER_HEADER}\n\nForce $F$ and $$ a = g $$ end")
    );
}

#[tokio::test]
async fn test_complex_mode_selects_complex_models() {
    let client = FakeClient::default()
        .with_text("vision-large", &["A flywheel."])
        .with_text("o3-mini", &["ok"]);
    let solver = Solver::new(client, catalog(), MemorySink::default());
    let image = figure();

    let updates = run(&solver, "q", Some(&image), true).await;
    assert_eq!(updates.last().expect("terminal update").phase, Phase::Done);

    let requests = solver.client().requests();
    assert_eq!(requests[0].0, "vision-large");
    assert_eq!(requests[0].2.reasoning_effort, None);
    assert_eq!(requests[1].0, "o3-mini");
    assert_eq!(requests[1].2.reasoning_effort, Some(ReasoningEffort::High));
}

#[tokio::test]
async fn test_solve_is_lazy() {
    let client = FakeClient::default().with_text("solver-mini", &["a", "b"]);
    let journal = client.journal.clone();
    let solver = Solver::new(client, catalog(), MemorySink::default());

    let first: Vec<SolveUpdate> = solver.solve("q", None, false).take(1).collect().await;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].phase, Phase::Started);
    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn test_requests_are_independent() {
    let client = FakeClient::default().with_text("solver-mini", &["first"]);
    let solver = Solver::new(client, catalog(), MemorySink::default());

    let first = run(&solver, "q", None, false).await;
    assert_eq!(first.last().expect("terminal update").phase, Phase::Done);

    // The script was consumed; a fresh request starts from an empty document.
    let second = run(&solver, "q", None, false).await;
    assert_eq!(second[0].document, "");
    assert_eq!(second.last().expect("terminal update").phase, Phase::Failed);
}
