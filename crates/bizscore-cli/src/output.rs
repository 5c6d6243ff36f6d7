//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use bizscore_connectors::EvaluationDto;
use bizscore_domain::{BenchmarkResult, PriorityItem, ScoreResult};
use bizscore_pipeline::{BatchSummary, Evaluation, RunFailure};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a successful evaluation.
    pub fn format_evaluation(&self, evaluation: &Evaluation) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&EvaluationDto::from(
                evaluation,
            ))?),
            OutputFormat::Quiet => Ok(quiet_line(evaluation)),
            OutputFormat::Table => Ok(self.evaluation_table(evaluation)),
        }
    }

    /// Format a failed run.
    pub fn format_failure(&self, failure: &RunFailure) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "run_id": failure.run_id.to_string(),
                "diagnosis_id": failure.identifier,
                "stage": failure.stage.as_str(),
                "attempts": failure.attempts_used,
                "reason": failure.reason,
            }))?),
            OutputFormat::Quiet => Ok(format!(
                "{}\tfailed\t{}",
                failure.identifier, failure.stage
            )),
            OutputFormat::Table => Ok(self.error(&format!(
                "{} failed at {} after {} attempt(s): {}",
                failure.identifier, failure.stage, failure.attempts_used, failure.reason
            ))),
        }
    }

    /// Format a batch summary.
    pub fn format_batch(&self, summary: &BatchSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let succeeded: Vec<EvaluationDto> =
                    summary.succeeded().map(EvaluationDto::from).collect();
                let failed: Vec<serde_json::Value> = summary
                    .failed()
                    .map(|f| {
                        serde_json::json!({
                            "diagnosis_id": f.identifier,
                            "stage": f.stage.as_str(),
                            "attempts": f.attempts_used,
                            "reason": f.reason,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "succeeded": succeeded,
                    "failed": failed,
                    "aborted": summary.aborted,
                    "elapsed_ms": u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
                }))?)
            }
            OutputFormat::Quiet => {
                let lines: Vec<String> = summary
                    .items
                    .iter()
                    .map(|item| match &item.result {
                        Ok(evaluation) => quiet_line(evaluation),
                        Err(failure) => {
                            format!("{}\tfailed\t{}", failure.identifier, failure.stage)
                        }
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
            OutputFormat::Table => Ok(self.batch_table(summary)),
        }
    }

    /// Format a direct scoring result.
    pub fn format_score(
        &self,
        score: &ScoreResult,
        benchmark: &BenchmarkResult,
        priorities: &[PriorityItem],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "total": score.total,
                "max_total": score.max_total,
                "percentage": score.percentage,
                "confidence_level": score.confidence_level,
                "defaulted_answers": score.defaulted_answers,
                "categories": score.category_scores.iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "score": c.score,
                    "weight": c.weight,
                })).collect::<Vec<_>>(),
                "industry": benchmark.industry.as_str(),
                "percentile": benchmark.percentile,
                "maturity_tier": benchmark.maturity_tier.as_str(),
                "grade": benchmark.grade.as_str(),
                "gap": benchmark.gap,
                "priorities": priorities.iter().map(|p| p.category.as_str()).collect::<Vec<_>>(),
            }))?),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{:.1}\t{}",
                score.total, score.percentage, benchmark.grade
            )),
            OutputFormat::Table => {
                let mut out = self.score_tables(score, benchmark);
                out.push('\n');
                out.push_str(&self.priority_table(priorities));
                Ok(out)
            }
        }
    }

    fn evaluation_table(&self, evaluation: &Evaluation) -> String {
        let mut out = self.success(&format!(
            "{} ({}) evaluated in run {}",
            evaluation.company_name, evaluation.identifier, evaluation.run_id
        ));
        out.push('\n');
        out.push_str(&self.score_tables(&evaluation.score, &evaluation.benchmark));
        out.push('\n');
        out.push_str(&self.priority_table(&evaluation.priorities));
        out.push('\n');
        out.push_str(&self.info(&format!(
            "Report: {} bytes, delivery {}",
            evaluation.report.len(),
            evaluation.sink
        )));
        out
    }

    fn score_tables(&self, score: &ScoreResult, benchmark: &BenchmarkResult) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Total", "Percentage", "Grade", "Tier", "Percentile", "Gap", "Confidence"]);
        builder.push_record([
            format!("{}/{}", score.total, score.max_total),
            format!("{:.1}%", score.percentage),
            self.grade(benchmark),
            benchmark.maturity_tier.to_string(),
            format!("~{}", benchmark.percentile),
            format!("{:+.1}", benchmark.gap),
            format!("{:.1}%", score.confidence_level),
        ]);
        let summary = styled(builder);

        let mut builder = Builder::default();
        builder.push_record(["Category", "Score", "Weight"]);
        for category in &score.category_scores {
            builder.push_record([
                category.name.clone(),
                format!("{:.1}", category.score),
                format!("{:.2}", category.weight),
            ]);
        }

        format!("{}\n{}", summary, styled(builder))
    }

    fn priority_table(&self, priorities: &[PriorityItem]) -> String {
        if priorities.is_empty() {
            return self.colorize("No improvement priorities.", "green");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Category", "Score", "Priority", "Timeline", "Resources"]);
        for (rank, item) in priorities.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                item.category.clone(),
                format!("{:.1}", item.current_score),
                item.priority.to_string(),
                item.timeline.to_string(),
                item.required_resources.join(", "),
            ]);
        }
        styled(builder)
    }

    fn batch_table(&self, summary: &BatchSummary) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Diagnosis", "Company", "Total", "Grade", "Status"]);
        for item in &summary.items {
            match &item.result {
                Ok(evaluation) => builder.push_record([
                    evaluation.identifier.clone(),
                    evaluation.company_name.clone(),
                    evaluation.score.total.to_string(),
                    self.grade(&evaluation.benchmark),
                    self.colorize("ok", "green"),
                ]),
                Err(failure) => builder.push_record([
                    failure.identifier.clone(),
                    String::new(),
                    String::new(),
                    String::new(),
                    self.colorize(&format!("failed at {}", failure.stage), "red"),
                ]),
            }
        }

        let mut out = styled(builder);
        out.push('\n');
        let counts = format!(
            "{} succeeded, {} failed, {} aborted in {:.2}s",
            summary.succeeded().count(),
            summary.failed().count(),
            summary.aborted,
            summary.elapsed.as_secs_f64()
        );
        if summary.failed().count() == 0 && summary.aborted == 0 {
            out.push_str(&self.success(&counts));
        } else {
            out.push_str(&self.warning(&counts));
            for failure in summary.failed() {
                out.push('\n');
                out.push_str(&format!("  {}: {}", failure.identifier, failure.reason));
            }
        }
        out
    }

    fn grade(&self, benchmark: &BenchmarkResult) -> String {
        let color = match benchmark.grade.as_str() {
            "S" | "A" => "green",
            "B" | "C" => "cyan",
            "D" => "yellow",
            _ => "red",
        };
        self.colorize(benchmark.grade.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn quiet_line(evaluation: &Evaluation) -> String {
    format!(
        "{}\t{}\t{}",
        evaluation.identifier, evaluation.score.total, evaluation.benchmark.grade
    )
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
