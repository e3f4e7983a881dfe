// Answer grading prompt templates.

pub const GRADE_SYSTEM: &str = "\
You are a senior technical interviewer grading a candidate's answer. \
Judge technical accuracy and coverage of the expected concepts. \
You MUST respond with valid JSON only, with no markdown fences and no explanations.";

pub const GRADE_PROMPT: &str = r#"Grade the candidate's answer to the interview question below.

QUESTION:
{question}

EXPECTED CONCEPTS:
{concepts}

CANDIDATE ANSWER:
{answer}

OUTPUT SCHEMA (return exactly this structure):
{
  "score": number between 0 and 100,
  "feedback": "two or three sentences of constructive feedback",
  "missing_concepts": ["expected concepts the answer did not cover"]
}"#;

pub fn build_grade_prompt(question: &str, concepts: &[String], answer: &str) -> String {
    let concepts = if concepts.is_empty() {
        "(none specified)".to_string()
    } else {
        concepts
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    GRADE_PROMPT
        .replace("{question}", question)
        .replace("{concepts}", &concepts)
        .replace("{answer}", answer)
}
