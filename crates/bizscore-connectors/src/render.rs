//! Self-contained HTML report renderer

use async_trait::async_trait;
use bizscore_domain::{BenchmarkResult, CompanyInfo, PriorityItem, RenderedReport, ScoreResult};
use bizscore_gatekeeper::markers::{
    self, escape, COMPANY_NAME_ATTR, DIAGNOSIS_ID_ATTR, TOTAL_SCORE_ATTR,
};
use bizscore_pipeline::{CollaboratorError, ReportRenderer};
use std::fmt::Write;

/// Renders a static HTML report with six sections
///
/// The article element carries the company name, diagnosis id and total
/// score as data attributes for the quality check.
#[derive(Debug, Clone, Default)]
pub struct PlainReportRenderer {
    title: Option<String>,
}

impl PlainReportRenderer {
    /// Create a renderer with the default title
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom report title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Business Diagnosis Report")
    }

    /// Render synchronously
    pub fn render_html(
        &self,
        score: &ScoreResult,
        benchmark: &BenchmarkResult,
        priorities: &[PriorityItem],
        company: &CompanyInfo,
    ) -> String {
        let mut html = String::with_capacity(4096);

        // Writing to a String cannot fail
        let _ = writeln!(
            html,
            "<article class=\"diagnosis-report\" {} {} {}>",
            markers::attribute(COMPANY_NAME_ATTR, &company.name),
            markers::attribute(DIAGNOSIS_ID_ATTR, &company.identifier),
            markers::attribute(TOTAL_SCORE_ATTR, &score.total.to_string()),
        );
        let _ = writeln!(
            html,
            "<header><h1>{}</h1><p class=\"company\">{}</p><p class=\"diagnosis-id\">Diagnosis {}</p></header>",
            escape(self.title()),
            escape(&company.name),
            escape(&company.identifier),
        );

        write_overview(&mut html, score, benchmark, company);
        write_categories(&mut html, score);
        write_benchmark(&mut html, benchmark);
        write_priorities(&mut html, priorities);
        write_confidence(&mut html, score);
        write_next_steps(&mut html, benchmark, priorities);

        html.push_str("</article>\n");
        html
    }
}

fn write_overview(
    html: &mut String,
    score: &ScoreResult,
    benchmark: &BenchmarkResult,
    company: &CompanyInfo,
) {
    let _ = writeln!(
        html,
        "<section class=\"overview\"><h2>Overview</h2>\
         <p>{} scored {} of {} points ({:.1}%), grade {}, maturity tier {}.</p>\
         <p>Industry: {}.</p></section>",
        escape(&company.name),
        score.total,
        score.max_total,
        score.percentage,
        benchmark.grade,
        benchmark.maturity_tier,
        company.industry,
    );
}

fn write_categories(html: &mut String, score: &ScoreResult) {
    html.push_str("<section class=\"categories\"><h2>Category Scores</h2><table>\n");
    html.push_str("<tr><th>Category</th><th>Score</th><th>Weight</th></tr>\n");
    for category in &score.category_scores {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{:.1}</td><td>{:.2}</td></tr>",
            escape(&category.name),
            category.score,
            category.weight
        );
    }
    html.push_str("</table></section>\n");
}

fn write_benchmark(html: &mut String, benchmark: &BenchmarkResult) {
    let position = if benchmark.gap >= 0.0 { "above" } else { "below" };
    let _ = writeln!(
        html,
        "<section class=\"benchmark\"><h2>Industry Benchmark</h2>\
         <p>The {} industry average is {:.1}%. This result is {:.1} points {} it, \
         an estimated percentile of {}.</p>\
         <p class=\"disclaimer\">The percentile is an approximation derived from the distance \
         to the industry average, not from a population distribution.</p></section>",
        benchmark.industry,
        benchmark.industry_average,
        benchmark.gap.abs(),
        position,
        benchmark.percentile,
    );
}

fn write_priorities(html: &mut String, priorities: &[PriorityItem]) {
    html.push_str("<section class=\"priorities\"><h2>Improvement Priorities</h2>\n");
    if priorities.is_empty() {
        html.push_str("<p>Every category is above the improvement threshold.</p>\n");
    } else {
        html.push_str("<ol>\n");
        for item in priorities {
            let _ = writeln!(
                html,
                "<li><strong>{}</strong> (score {:.1}, priority {}): {}. Resources: {}.</li>",
                escape(&item.category),
                item.current_score,
                item.priority,
                item.timeline,
                escape(&item.required_resources.join(", ")),
            );
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</section>\n");
}

fn write_confidence(html: &mut String, score: &ScoreResult) {
    let _ = writeln!(
        html,
        "<section class=\"confidence\"><h2>Confidence</h2>\
         <p>Confidence level {:.1}%. {} answer(s) were missing or out of range and \
         were scored at the midpoint.</p></section>",
        score.confidence_level, score.defaulted_answers,
    );
}

fn write_next_steps(html: &mut String, benchmark: &BenchmarkResult, priorities: &[PriorityItem]) {
    let focus = priorities
        .first()
        .map(|item| format!("Start with {}.", escape(&item.category)))
        .unwrap_or_else(|| "Maintain current practice and reassess in twelve months.".to_string());
    let _ = writeln!(
        html,
        "<section class=\"next-steps\"><h2>Next Steps</h2>\
         <p>{}</p><p>Moving from the {} tier to the next one typically takes two to three \
         quarters of focused work.</p></section>",
        focus, benchmark.maturity_tier,
    );
}

#[async_trait]
impl ReportRenderer for PlainReportRenderer {
    async fn render(
        &self,
        score: &ScoreResult,
        benchmark: &BenchmarkResult,
        priorities: &[PriorityItem],
        company: &CompanyInfo,
    ) -> Result<RenderedReport, CollaboratorError> {
        Ok(RenderedReport::new(
            self.render_html(score, benchmark, priorities, company),
        ))
    }
}
