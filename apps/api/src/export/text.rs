use std::fmt::Write;

use crate::export::InterviewReport;

/// Plain-text report, also used as the inline email body for the text format.
pub fn render_text(report: &InterviewReport) -> String {
    let mut out = String::new();
    heading(&mut out, "TECHNICAL INTERVIEW RESULTS", '=');
    if let Some(name) = &report.candidate_name {
        let _ = writeln!(out, "Candidate:     {name}");
    }
    let _ = writeln!(out, "Date:          {}", report.date);
    let _ = writeln!(out, "Overall Score: {:.1}/100", report.overall_score);
    let _ = writeln!(out, "Rating:        {}", report.rating);
    out.push('\n');

    heading(&mut out, "EXTRACTED SKILLS", '-');
    if report.skills.is_empty() {
        out.push_str("No skills were identified.\n");
    } else {
        let width = report
            .skills
            .iter()
            .map(|(c, _)| c.label().len())
            .max()
            .unwrap_or(0);
        for (category, keywords) in report.skills.iter() {
            let _ = writeln!(
                out,
                "{:<width$}  {}",
                format!("{}:", category.label()),
                keywords.join(", "),
                width = width + 1
            );
        }
    }
    out.push('\n');

    heading(&mut out, "INTERVIEW QUESTIONS AND EVALUATIONS", '-');
    if report.questions.is_empty() {
        out.push_str("No answers were recorded.\n");
    }
    for q in &report.questions {
        let _ = writeln!(out, "Question {}: {}", q.question_number, q.question_text);
        let _ = writeln!(out, "  Answer:   {}", q.answer);
        let _ = writeln!(out, "  Score:    {}/100", q.score);
        let _ = writeln!(out, "  Feedback: {}", q.feedback);
        if !q.missing_concepts.is_empty() {
            let _ = writeln!(out, "  Missing:  {}", q.missing_concepts.join(", "));
        }
        out.push('\n');
    }
    out
}

fn heading(out: &mut String, title: &str, underline: char) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", underline.to_string().repeat(title.len()));
}
