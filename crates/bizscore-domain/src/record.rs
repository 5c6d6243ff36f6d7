//! Retrieved diagnosis records and rendered reports

use crate::answers::AnswerVector;
use crate::benchmark::IndustryType;
use std::fmt;

/// Diagnosis payload returned by the data retriever
///
/// Every field except the identifier is optional: the retriever is an
/// untrusted collaborator, and presence is enforced by the retrieve-data
/// postcondition rather than by this type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosisRecord {
    /// Diagnosis identifier as reported by the source
    pub identifier: String,

    /// Company name
    pub company_name: Option<String>,

    /// Free-form industry name
    pub industry: Option<String>,

    /// Raw positional answers (index 0 is question 1)
    pub answers: Option<Vec<i64>>,

    /// Total score the source system computed, if any
    pub reported_total: Option<u32>,

    /// Contact email for delivery
    pub contact_email: Option<String>,
}

impl DiagnosisRecord {
    /// Create a record with only an identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Set the company name
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Set the industry
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the raw answers
    pub fn with_answers(mut self, answers: Vec<i64>) -> Self {
        self.answers = Some(answers);
        self
    }

    /// Set the total reported by the source
    pub fn with_reported_total(mut self, total: u32) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Set the contact email
    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }

    /// Company name, treating blank strings as absent
    pub fn company_name(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Industry classification (unknown or missing → [`IndustryType::Other`])
    pub fn industry_type(&self) -> IndustryType {
        IndustryType::parse_or_other(self.industry.as_deref())
    }

    /// Normalized answer vector, if the record carries answers
    pub fn answer_vector(&self, question_count: usize) -> Option<AnswerVector> {
        self.answers
            .as_deref()
            .map(|raw| AnswerVector::from_raw(raw, question_count))
    }

    /// Identifying fields handed to the report renderer
    pub fn company_info(&self) -> Option<CompanyInfo> {
        self.company_name().map(|name| CompanyInfo {
            identifier: self.identifier.clone(),
            name: name.to_string(),
            industry: self.industry_type(),
        })
    }
}

/// Identifying fields of the company a report is rendered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInfo {
    /// Diagnosis identifier
    pub identifier: String,
    /// Company name
    pub name: String,
    /// Industry classification
    pub industry: IndustryType,
}

/// Report artifact produced by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport(String);

impl RenderedReport {
    /// Wrap rendered content
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Report content
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing was rendered
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Take the content
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_company_name_is_absent() {
        let record = DiagnosisRecord::new("DX-20250301-0042").with_company_name("   ");
        assert_eq!(record.company_name(), None);
        assert!(record.company_info().is_none());
    }

    #[test]
    fn test_company_info() {
        let record = DiagnosisRecord::new("DX-20250301-0042")
            .with_company_name(" Acme Tooling ")
            .with_industry("software");
        let info = record.company_info().unwrap();
        assert_eq!(info.name, "Acme Tooling");
        assert_eq!(info.identifier, "DX-20250301-0042");
        assert_eq!(info.industry, IndustryType::Technology);
    }

    #[test]
    fn test_unknown_industry_falls_back() {
        let record = DiagnosisRecord::new("DX-1").with_industry("agriculture");
        assert_eq!(record.industry_type(), IndustryType::Other);
        assert_eq!(DiagnosisRecord::new("DX-1").industry_type(), IndustryType::Other);
    }

    #[test]
    fn test_answer_vector() {
        let record = DiagnosisRecord::new("DX-1").with_answers(vec![5, 4]);
        let answers = record.answer_vector(3).unwrap();
        assert_eq!(answers.values(), &[5, 4, 3]);
        assert!(DiagnosisRecord::new("DX-1").answer_vector(3).is_none());
    }

    #[test]
    fn test_rendered_report_emptiness() {
        assert!(RenderedReport::new(" \n").is_empty());
        let report = RenderedReport::new("<section>");
        assert!(!report.is_empty());
        assert_eq!(report.len(), 9);
    }
}
