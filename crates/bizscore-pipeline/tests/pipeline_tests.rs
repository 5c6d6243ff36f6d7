//! Integration tests for the standard pipeline

use async_trait::async_trait;
use bizscore_domain::{
    BenchmarkResult, CompanyInfo, DiagnosisRecord, Grade, PriorityItem, RenderedReport, RunId,
    ScoreResult,
};
use bizscore_gatekeeper::markers::{self, COMPANY_NAME_ATTR, DIAGNOSIS_ID_ATTR, TOTAL_SCORE_ATTR};
use bizscore_pipeline::{
    BatchRunner, CollaboratorError, DataRetriever, Evaluation, Evaluator, Orchestrator,
    PipelineConfig, PipelineError, ReportRenderer, ResultSink, RunContext, RunStatus, SinkOutcome,
    StageId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

const ID: &str = "DX-20250301-0042";

/// Retriever backed by a map, failing the first `failures` calls
struct MapRetriever {
    records: HashMap<String, DiagnosisRecord>,
    failures: u32,
    calls: AtomicU32,
}

impl MapRetriever {
    fn new(records: Vec<DiagnosisRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.identifier.clone(), r))
                .collect(),
            failures: 0,
            calls: AtomicU32::new(0),
        }
    }

    fn failing_first(mut self, failures: u32) -> Self {
        self.failures = failures;
        self
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataRetriever for MapRetriever {
    async fn retrieve(&self, identifier: &str) -> Result<DiagnosisRecord, CollaboratorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(CollaboratorError::Unavailable("connection reset".to_string()));
        }
        self.records
            .get(identifier)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(identifier.to_string()))
    }
}

/// Renderer producing a well-formed report, optionally with a wrong company name
struct HtmlRenderer {
    name_override: Option<String>,
    sections: usize,
    calls: AtomicU32,
}

impl HtmlRenderer {
    fn new() -> Self {
        Self {
            name_override: None,
            sections: 6,
            calls: AtomicU32::new(0),
        }
    }

    fn with_name(mut self, name: &str) -> Self {
        self.name_override = Some(name.to_string());
        self
    }

    fn with_sections(mut self, sections: usize) -> Self {
        self.sections = sections;
        self
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportRenderer for HtmlRenderer {
    async fn render(
        &self,
        score: &ScoreResult,
        benchmark: &BenchmarkResult,
        priorities: &[PriorityItem],
        company: &CompanyInfo,
    ) -> Result<RenderedReport, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = self.name_override.as_deref().unwrap_or(&company.name);

        let mut html = format!(
            "<article {} {} {}>\n<h1>{}</h1>\n",
            markers::attribute(COMPANY_NAME_ATTR, name),
            markers::attribute(DIAGNOSIS_ID_ATTR, &company.identifier),
            markers::attribute(TOTAL_SCORE_ATTR, &score.total.to_string()),
            markers::escape(name),
        );
        for i in 0..self.sections {
            html.push_str(&format!(
                "<section id=\"part-{}\"><p>Diagnosis {} scored {:.1}% with grade {} and {} priority items in this assessment.</p></section>\n",
                i,
                company.identifier,
                score.percentage,
                benchmark.grade,
                priorities.len()
            ));
        }
        html.push_str("</article>\n");
        Ok(RenderedReport::new(html))
    }
}

#[derive(Default)]
struct RecordingSink {
    fail: bool,
    delivered: Mutex<Vec<RunId>>,
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn deliver(&self, evaluation: &Evaluation) -> Result<(), CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::Io("disk full".to_string()));
        }
        self.delivered.lock().unwrap().push(evaluation.run_id);
        Ok(())
    }
}

fn create_test_record(identifier: &str) -> DiagnosisRecord {
    DiagnosisRecord::new(identifier)
        .with_company_name("Acme Tooling")
        .with_industry("manufacturing")
        .with_answers(vec![3; 45])
        .with_reported_total(135)
}

fn evaluator(retriever: Arc<MapRetriever>, renderer: Arc<HtmlRenderer>) -> Evaluator {
    let settings = PipelineConfig::default().build().unwrap();
    Evaluator::standard(&settings, retriever, renderer).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_midpoint_answers_score_sixty_grade_c() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]));
    let renderer = Arc::new(HtmlRenderer::new());

    let evaluation = evaluator(retriever, renderer).evaluate(ID).await.unwrap();

    assert_eq!(evaluation.identifier, ID);
    assert_eq!(evaluation.company_name, "Acme Tooling");
    assert_eq!(evaluation.score.total, 135);
    assert_eq!(evaluation.score.percentage, 60.0);
    assert_eq!(evaluation.benchmark.grade, Grade::C);
    assert_eq!(evaluation.priorities.len(), 5);
    assert_eq!(evaluation.sink, SinkOutcome::NotConfigured);
    assert_eq!(evaluation.metrics.total_attempts(), 5);
    assert_eq!(evaluation.metrics.stages_completed, 5);
}

#[tokio::test(start_paused = true)]
async fn test_success_records_every_stage_in_order() {
    let settings = PipelineConfig::default().build().unwrap();
    let orchestrator = Orchestrator::standard(
        &settings,
        Arc::new(MapRetriever::new(vec![create_test_record(ID)])),
        Arc::new(HtmlRenderer::new()),
    )
    .unwrap();

    let run = orchestrator.run(RunContext::with_identifier(ID)).await;

    assert_eq!(run.status(), RunStatus::Succeeded);
    let stages: Vec<StageId> = run.records().iter().map(|r| r.stage).collect();
    assert_eq!(stages, StageId::ALL.to_vec());
    assert!(run.records().iter().all(|r| r.passed && r.attempts == 1));
}

#[tokio::test(start_paused = true)]
async fn test_missing_company_name_exhausts_retrieval() {
    let mut record = create_test_record(ID);
    record.company_name = None;
    let retriever = Arc::new(MapRetriever::new(vec![record]));
    let renderer = Arc::new(HtmlRenderer::new());

    let failure = evaluator(retriever.clone(), renderer.clone())
        .evaluate(ID)
        .await
        .unwrap_err();

    // Default policy: 3 retries
    assert_eq!(failure.stage, StageId::RetrieveData);
    assert_eq!(failure.attempts_used, 4);
    assert_eq!(retriever.calls(), 4);
    assert!(failure.reason.contains("companyName is missing"));
    assert!(matches!(failure.error, PipelineError::StageExhausted { .. }));
    assert_eq!(failure.metrics.attempts_for(StageId::ComputeScore), 0);
    assert_eq!(renderer.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_company_name_mismatch_fails_at_quality_check() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]));
    let renderer = Arc::new(HtmlRenderer::new().with_name("Acme Tooling Ltd"));

    let failure = evaluator(retriever, renderer.clone())
        .evaluate(ID)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, StageId::QualityCheck);
    assert_eq!(failure.attempts_used, 2);
    assert_eq!(renderer.calls(), 1);
    assert!(failure
        .reason
        .contains("report embeds company name 'Acme Tooling Ltd', source has 'Acme Tooling'"));
}

#[tokio::test(start_paused = true)]
async fn test_unrelated_company_name_passes_render_and_fails_quality_check() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]));
    let renderer = Arc::new(HtmlRenderer::new().with_name("Globex Corporation"));

    let failure = evaluator(retriever, renderer.clone())
        .evaluate(ID)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, StageId::QualityCheck);
    assert_eq!(renderer.calls(), 1);
    assert_eq!(failure.metrics.attempts_for(StageId::RenderReport), 1);
    assert!(failure
        .reason
        .contains("report embeds company name 'Globex Corporation', source has 'Acme Tooling'"));
}

#[tokio::test(start_paused = true)]
async fn test_too_few_sections_fails_at_render() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]));
    let renderer = Arc::new(HtmlRenderer::new().with_sections(3));

    let failure = evaluator(retriever, renderer.clone())
        .evaluate(ID)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, StageId::RenderReport);
    assert_eq!(failure.attempts_used, 3);
    assert_eq!(renderer.calls(), 3);
    assert!(failure
        .reason
        .contains("report rendering produced 3 structural sections, 5 required"));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_identifier_never_reaches_retrieval() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]));

    let failure = evaluator(retriever.clone(), Arc::new(HtmlRenderer::new()))
        .evaluate("order-42")
        .await
        .unwrap_err();

    assert_eq!(failure.stage, StageId::ValidateInput);
    assert_eq!(failure.attempts_used, 2);
    assert_eq!(retriever.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_retrieval_failure_is_retried() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]).failing_first(2));

    let evaluation = evaluator(retriever.clone(), Arc::new(HtmlRenderer::new()))
        .evaluate(ID)
        .await
        .unwrap();

    assert_eq!(retriever.calls(), 3);
    assert_eq!(evaluation.metrics.attempts_for(StageId::RetrieveData), 3);
    assert_eq!(evaluation.metrics.total_retries(), 2);
    assert_eq!(evaluation.metrics.total_failures(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_identical_inputs_give_identical_results() {
    let evaluator = evaluator(
        Arc::new(MapRetriever::new(vec![create_test_record(ID)])),
        Arc::new(HtmlRenderer::new()),
    );

    let first = evaluator.evaluate(ID).await.unwrap();
    let second = evaluator.evaluate(ID).await.unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(first.score, second.score);
    assert_eq!(first.benchmark, second.benchmark);
    assert_eq!(first.priorities, second.priorities);
}

#[tokio::test(start_paused = true)]
async fn test_sink_outcomes() {
    let sink = Arc::new(RecordingSink::default());
    let evaluator = evaluator(
        Arc::new(MapRetriever::new(vec![create_test_record(ID)])),
        Arc::new(HtmlRenderer::new()),
    )
    .with_sink(sink.clone());

    let evaluation = evaluator.evaluate(ID).await.unwrap();
    assert_eq!(evaluation.sink, SinkOutcome::Delivered);
    assert_eq!(*sink.delivered.lock().unwrap(), vec![evaluation.run_id]);

    let failing = Arc::new(RecordingSink {
        fail: true,
        ..Default::default()
    });
    let settings = PipelineConfig::default().build().unwrap();
    let evaluator = Evaluator::standard(
        &settings,
        Arc::new(MapRetriever::new(vec![create_test_record(ID)])),
        Arc::new(HtmlRenderer::new()),
    )
    .unwrap()
    .with_sink(failing);

    let evaluation = evaluator.evaluate(ID).await.unwrap();
    assert_eq!(evaluation.sink, SinkOutcome::Failed("I/O error: disk full".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_run_starts_no_stage() {
    let retriever = Arc::new(MapRetriever::new(vec![create_test_record(ID)]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let failure = evaluator(retriever.clone(), Arc::new(HtmlRenderer::new()))
        .evaluate_with_cancel(ID, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        PipelineError::Cancelled {
            stage: StageId::ValidateInput
        }
    ));
    assert_eq!(failure.attempts_used, 0);
    assert_eq!(retriever.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_batch_keeps_input_order() {
    let retriever = Arc::new(MapRetriever::new(vec![
        create_test_record("DX-20250301-0001"),
        create_test_record("DX-20250301-0003"),
    ]));
    let evaluator = Arc::new(evaluator(retriever, Arc::new(HtmlRenderer::new())));
    let runner = BatchRunner::new(evaluator, 2);

    let summary = runner
        .run(vec![
            "DX-20250301-0001".to_string(),
            "DX-20250301-0002".to_string(),
            "DX-20250301-0003".to_string(),
        ])
        .await;

    let identifiers: Vec<&str> = summary.items.iter().map(|i| i.identifier.as_str()).collect();
    assert_eq!(
        identifiers,
        vec!["DX-20250301-0001", "DX-20250301-0002", "DX-20250301-0003"]
    );
    assert_eq!(summary.succeeded().count(), 2);
    assert_eq!(summary.aborted, 0);

    let failure = summary.failed().next().unwrap();
    assert_eq!(failure.identifier, "DX-20250301-0002");
    assert_eq!(failure.stage, StageId::RetrieveData);
    assert!(failure.reason.contains("Not found"));

    assert_eq!(summary.metrics.runs, 3);
    assert!(summary.summary().contains("2 succeeded, 1 failed, 0 aborted"));
}
