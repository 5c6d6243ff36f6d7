//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use bizscore_domain::{benchmark, prioritize, score, AnswerVector, IndustryType};
use std::fs;

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let scoring = config.pipeline.build()?.scoring;
    let raw = load_answers(&args)?;
    let industry = parse_industry(args.industry.as_deref())?;

    let answers = AnswerVector::from_raw(&raw, scoring.categories.question_count());
    let result = score(&answers, &scoring.categories);
    let bench = benchmark(&result, industry, &scoring.benchmark);
    let priorities = prioritize(&result.category_scores, &scoring.priority);

    if result.defaulted_answers > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} answer(s) missing or out of range, scored as 3",
                result.defaulted_answers
            ))
        );
    }
    println!("{}", formatter.format_score(&result, &bench, &priorities)?);
    Ok(())
}

fn load_answers(args: &ScoreArgs) -> Result<Vec<i64>> {
    let raw: Vec<i64> = match &args.file {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => args.answers.clone(),
    };
    if raw.is_empty() {
        return Err(CliError::InvalidInput(
            "Must specify answers or --file".to_string(),
        ));
    }
    Ok(raw)
}

fn parse_industry(name: Option<&str>) -> Result<IndustryType> {
    match name {
        None => Ok(IndustryType::Other),
        Some(name) => IndustryType::parse(name)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown industry: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(answers: Vec<i64>) -> ScoreArgs {
        ScoreArgs {
            answers,
            file: None,
            industry: None,
        }
    }

    #[test]
    fn test_answers_from_args() {
        assert_eq!(load_answers(&args(vec![1, 2, 3])).unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            load_answers(&args(vec![])),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_answers_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "[5, 4, 0, 9]").unwrap();

        let mut score_args = args(vec![]);
        score_args.file = Some(path);
        assert_eq!(load_answers(&score_args).unwrap(), vec![5, 4, 0, 9]);
    }

    #[test]
    fn test_parse_industry() {
        assert_eq!(parse_industry(None).unwrap(), IndustryType::Other);
        assert_eq!(parse_industry(Some("retail")).unwrap(), IndustryType::Retail);
        assert!(parse_industry(Some("shipbuilding")).is_err());
    }
}
