use std::fmt::Write;

use crate::export::InterviewReport;

/// Renders the detailed Markdown summary.
pub fn render_markdown(report: &InterviewReport) -> String {
    let mut out = String::new();
    out.push_str("# Technical Interview Results\n\n");
    if let Some(name) = &report.candidate_name {
        let _ = writeln!(out, "**Candidate:** {name}  ");
    }
    let _ = writeln!(out, "**Date:** {}  ", report.date);
    let _ = writeln!(out, "**Overall Score:** {:.1}/100  ", report.overall_score);
    let _ = writeln!(out, "**Rating:** {}\n", report.rating);

    out.push_str("## Extracted Skills\n\n");
    if report.skills.is_empty() {
        out.push_str("No skills were identified.\n\n");
    } else {
        out.push_str("| Category | Skills |\n|---|---|\n");
        for (category, keywords) in report.skills.iter() {
            let _ = writeln!(out, "| {} | {} |", category.label(), keywords.join(", "));
        }
        out.push('\n');
    }

    out.push_str("## Interview Questions and Evaluations\n\n");
    if report.questions.is_empty() {
        out.push_str("No answers were recorded.\n");
    }
    for q in &report.questions {
        let _ = writeln!(out, "### Question {}: {}\n", q.question_number, q.question_text);
        let _ = writeln!(out, "**Answer:** {}\n", q.answer);
        let _ = writeln!(out, "**Score:** {}/100\n", q.score);
        let _ = writeln!(out, "**Feedback:** {}\n", q.feedback);
        if !q.missing_concepts.is_empty() {
            out.push_str("**Missing concepts:**\n\n");
            for concept in &q.missing_concepts {
                let _ = writeln!(out, "- {concept}");
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures::sample_report;

    #[test]
    fn test_markdown_header_and_scores() {
        let md = render_markdown(&sample_report());
        assert!(md.starts_with("# Technical Interview Results\n"));
        assert!(md.contains("**Candidate:** Ada Lovelace"));
        assert!(md.contains("**Overall Score:** 70.0/100"));
        assert!(md.contains("**Rating:** Good"));
        assert!(md.contains("| Programming | python |"));
        let heading = "### Question 2: Explain the difference between EC2 and Lambda on AWS.";
        assert!(md.contains(heading));
        assert!(md.contains("- serverless\n- pricing\n"));
    }

    #[test]
    fn test_markdown_questions_in_order() {
        let md = render_markdown(&sample_report());
        let first = md.find("### Question 1").unwrap();
        let second = md.find("### Question 2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_markdown_is_deterministic() {
        let report = sample_report();
        assert_eq!(render_markdown(&report), render_markdown(&report));
    }

    #[test]
    fn test_markdown_without_skills_or_answers() {
        let mut report = sample_report();
        report.skills = Default::default();
        report.questions.clear();
        let md = render_markdown(&report);
        assert!(md.contains("No skills were identified."));
        assert!(md.contains("No answers were recorded."));
    }
}
