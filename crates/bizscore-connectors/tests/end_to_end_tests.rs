//! End-to-end tests: real connectors driving the standard pipeline

use bizscore_connectors::{
    EvaluationDto, FileRetriever, JsonLinesSink, MemorySink, MockRetriever, PlainReportRenderer,
};
use bizscore_domain::{DiagnosisRecord, Grade};
use bizscore_pipeline::{
    BatchRunner, Evaluator, PipelineConfig, PipelineError, SinkOutcome, StageId,
};
use std::sync::Arc;
use tempfile::TempDir;

const RECORDS: &str = r#"[
    {
        "diagnosisId": "DX-20250301-0001",
        "companyName": "Northwind & Co",
        "industry": "retail",
        "answers": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
                    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
        "totalScore": 135
    },
    {
        "diagnosisId": "DX-20250301-0002",
        "industry": "finance",
        "answers": [5, 5, 5]
    }
]"#;

fn write_records(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("records.json");
    std::fs::write(&path, RECORDS).unwrap();
    path
}

#[tokio::test(start_paused = true)]
async fn test_file_records_to_json_lines() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let output = dir.path().join("evaluations.jsonl");

    for config in [
        PipelineConfig::default(),
        PipelineConfig::strict(),
        PipelineConfig::lenient(),
    ] {
        let settings = config.build().unwrap();
        let evaluator = Evaluator::standard(
            &settings,
            Arc::new(FileRetriever::new(&records)),
            Arc::new(PlainReportRenderer::new()),
        )
        .unwrap()
        .with_sink(Arc::new(JsonLinesSink::new(&output)));

        let evaluation = evaluator.evaluate("DX-20250301-0001").await.unwrap();
        assert_eq!(evaluation.score.percentage, 60.0);
        assert_eq!(evaluation.benchmark.grade, Grade::C);
        assert_eq!(evaluation.sink, SinkOutcome::Delivered);
    }

    let content = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<EvaluationDto> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|dto| dto.company_name == "Northwind & Co"));
    assert!(lines.iter().all(|dto| dto.total == 135 && dto.report.is_none()));
}

#[tokio::test(start_paused = true)]
async fn test_record_without_company_name_fails_retrieval() {
    let dir = TempDir::new().unwrap();
    let settings = PipelineConfig::default().build().unwrap();
    let sink = Arc::new(MemorySink::new());
    let evaluator = Evaluator::standard(
        &settings,
        Arc::new(FileRetriever::new(write_records(&dir))),
        Arc::new(PlainReportRenderer::new()),
    )
    .unwrap()
    .with_sink(sink.clone());

    let failure = evaluator.evaluate("DX-20250301-0002").await.unwrap_err();

    assert_eq!(failure.stage, StageId::RetrieveData);
    assert_eq!(failure.attempts_used, 4);
    assert!(failure.reason.contains("companyName is missing"));
    assert_eq!(failure.metrics.attempts_for(StageId::ComputeScore), 0);
    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reported_total_mismatch_fails_quality_check() {
    let retriever = MockRetriever::with_records([DiagnosisRecord::new("DX-20250301-0042")
        .with_company_name("Acme Tooling")
        .with_answers(vec![4; 45])
        .with_reported_total(170)]);
    let settings = PipelineConfig::default().build().unwrap();
    let evaluator = Evaluator::standard(
        &settings,
        Arc::new(retriever),
        Arc::new(PlainReportRenderer::new()),
    )
    .unwrap();

    let failure = evaluator.evaluate("DX-20250301-0042").await.unwrap_err();
    assert_eq!(failure.stage, StageId::QualityCheck);
    assert!(failure
        .reason
        .contains("source reports total score 170, computed 180"));

    // The lenient preset does not compare reported totals
    let settings = PipelineConfig::lenient().build().unwrap();
    let retriever = MockRetriever::with_records([DiagnosisRecord::new("DX-20250301-0042")
        .with_company_name("Acme Tooling")
        .with_answers(vec![4; 45])
        .with_reported_total(170)]);
    let evaluator = Evaluator::standard(
        &settings,
        Arc::new(retriever),
        Arc::new(PlainReportRenderer::new()),
    )
    .unwrap();
    assert!(evaluator.evaluate("DX-20250301-0042").await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_batch_with_memory_sink() {
    let retriever = MockRetriever::with_records((1..=6).map(|i| {
        DiagnosisRecord::new(format!("DX-20250301-000{}", i))
            .with_company_name(format!("Company {}", i))
            .with_industry("technology")
            .with_answers(vec![(i % 5 + 1) as i64; 45])
    }));
    let sink = Arc::new(MemorySink::new());
    let settings = PipelineConfig::default().build().unwrap();
    let evaluator = Evaluator::standard(
        &settings,
        Arc::new(retriever.clone()),
        Arc::new(PlainReportRenderer::new()),
    )
    .unwrap()
    .with_sink(sink.clone());

    let mut identifiers: Vec<String> = (1..=6).map(|i| format!("DX-20250301-000{}", i)).collect();
    identifiers.push("bad id".to_string());

    let summary = BatchRunner::new(Arc::new(evaluator), settings.batch_concurrency)
        .run(identifiers)
        .await;

    assert_eq!(summary.items.len(), 7);
    assert_eq!(summary.succeeded().count(), 6);
    assert_eq!(sink.len(), 6);
    assert_eq!(retriever.call_count(), 6);

    let failure = summary.failed().next().unwrap();
    assert_eq!(failure.stage, StageId::ValidateInput);
    assert!(matches!(failure.error, PipelineError::StageExhausted { .. }));
    assert_eq!(summary.metrics.runs, 7);
}

#[tokio::test(start_paused = true)]
async fn test_company_names_containing_marker_words() {
    let names = ["Todo Hogar S.A.", "Placeholder Media Group", "Lorem Ipsum Studio"];
    let records = names.iter().enumerate().map(|(i, name)| {
        DiagnosisRecord::new(format!("DX-20250301-010{}", i))
            .with_company_name(*name)
            .with_industry("services")
            .with_answers(vec![4; 45])
    });
    let retriever = MockRetriever::with_records(records);

    for config in [PipelineConfig::default(), PipelineConfig::strict()] {
        let settings = config.build().unwrap();
        let evaluator = Evaluator::standard(
            &settings,
            Arc::new(retriever.clone()),
            Arc::new(PlainReportRenderer::new()),
        )
        .unwrap();

        for (i, name) in names.iter().enumerate() {
            let evaluation = evaluator
                .evaluate(&format!("DX-20250301-010{}", i))
                .await
                .unwrap_or_else(|failure| panic!("{}: {}", name, failure));
            assert_eq!(evaluation.company_name, *name);
            assert_eq!(evaluation.metrics.attempts_for(StageId::QualityCheck), 1);
        }
    }
}
