//! Static question bank: skill keyword → technical questions, plus a generic pool.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An interview question and the concepts a complete answer should mention.
///
/// The question text is its identity: selection dedups on it and answers are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub expected_concepts: Vec<String>,
}

impl Question {
    pub fn new(text: &str, concepts: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            expected_concepts: concepts.iter().map(|c| c.to_string()).collect(),
        }
    }
}

type Entry = (&'static str, &'static [&'static str]);

#[rustfmt::skip]
const SKILL_QUESTIONS: &[(&str, &[Entry])] = &[
    ("python", &[
        ("What is the difference between a list and a tuple in Python?",
            &["mutable", "immutable", "performance", "hashable"]),
        ("Explain how decorators work in Python.",
            &["function", "wrapper", "closure", "@ syntax"]),
        ("How does the Global Interpreter Lock affect multithreaded Python code?",
            &["gil", "thread", "cpu-bound", "multiprocessing"]),
    ]),
    ("java", &[
        ("Explain the difference between an interface and an abstract class in Java.",
            &["multiple inheritance", "implementation", "constructor", "default method"]),
        ("How does garbage collection work in the JVM?",
            &["heap", "generation", "reachable", "stop-the-world"]),
    ]),
    ("javascript", &[
        ("Explain closures in JavaScript and give a use case.",
            &["scope", "function", "variable", "private"]),
        ("How does the JavaScript event loop work?",
            &["call stack", "callback queue", "microtask", "asynchronous"]),
    ]),
    ("typescript", &[
        ("What advantages does TypeScript offer over plain JavaScript?",
            &["static typing", "compile", "interface", "tooling"]),
    ]),
    ("sql", &[
        ("What is the difference between an INNER JOIN and a LEFT JOIN?",
            &["matching rows", "null", "all rows", "left table"]),
        ("How would you find and fix a slow SQL query?",
            &["index", "execution plan", "explain", "full table scan"]),
    ]),
    ("rust", &[
        ("Explain ownership and borrowing in Rust.",
            &["owner", "borrow checker", "reference", "lifetime"]),
        ("When would you use Box, Rc and Arc in Rust?",
            &["heap", "reference counting", "thread", "shared ownership"]),
    ]),
    ("go", &[
        ("How do goroutines and channels work together in Go?",
            &["goroutine", "channel", "concurrency", "select"]),
    ]),
    ("c++", &[
        ("What is RAII in C++ and why does it matter?",
            &["constructor", "destructor", "resource", "scope"]),
        ("Explain the difference between unique_ptr and shared_ptr.",
            &["ownership", "reference count", "move", "memory leak"]),
    ]),
    ("react", &[
        ("What is the virtual DOM and how does React use it?",
            &["diff", "reconciliation", "render", "performance"]),
        ("Explain the purpose of the useEffect hook.",
            &["side effect", "dependency array", "cleanup", "render"]),
    ]),
    ("django", &[
        ("How does the Django ORM help prevent SQL injection?",
            &["parameterized", "query", "escape", "model"]),
    ]),
    ("flask", &[
        ("How would you structure a large Flask application?",
            &["blueprint", "application factory", "configuration", "extension"]),
    ]),
    ("node.js", &[
        ("How does Node.js handle many concurrent connections on a single thread?",
            &["event loop", "non-blocking", "callback", "libuv"]),
        ("What is middleware in an Express or Node.js application?",
            &["request", "response", "next", "chain"]),
    ]),
    ("spring", &[
        ("What is dependency injection in Spring?",
            &["bean", "container", "inversion of control", "autowired"]),
    ]),
    ("tensorflow", &[
        ("How do you prevent overfitting when training a TensorFlow model?",
            &["regularization", "dropout", "validation", "early stopping"]),
    ]),
    ("pytorch", &[
        ("Explain how autograd works in PyTorch.",
            &["computational graph", "gradient", "backward", "tensor"]),
    ]),
    ("mongodb", &[
        ("When would you choose MongoDB over a relational database?",
            &["schema", "document", "scalability", "consistency"]),
    ]),
    ("postgresql", &[
        ("What are transaction isolation levels in PostgreSQL?",
            &["read committed", "repeatable read", "serializable", "dirty read"]),
    ]),
    ("redis", &[
        ("What are common use cases for Redis?",
            &["cache", "in-memory", "pub/sub", "expiration"]),
    ]),
    ("aws", &[
        ("Explain the difference between EC2 and Lambda on AWS.",
            &["server", "serverless", "scaling", "pricing"]),
        ("How would you design a highly available application on AWS?",
            &["availability zone", "load balancer", "auto scaling", "replication"]),
    ]),
    ("docker", &[
        ("What is the difference between a Docker image and a container?",
            &["template", "instance", "layer", "runtime"]),
        ("How would you reduce the size of a Docker image?",
            &["multi-stage", "base image", "layer", "cache"]),
    ]),
    ("kubernetes", &[
        ("Explain pods, deployments and services in Kubernetes.",
            &["pod", "replica", "service", "load balancing"]),
        ("How does Kubernetes handle a container that keeps crashing?",
            &["restart policy", "liveness check", "backoff", "logs"]),
    ]),
    ("azure", &[
        ("Which Azure services would you use to host a web API?",
            &["app service", "functions", "scaling", "monitoring"]),
    ]),
    ("git", &[
        ("What is the difference between git merge and git rebase?",
            &["history", "commit", "linear", "conflict"]),
        ("How do you resolve a merge conflict in git?",
            &["conflict markers", "edit", "commit", "communicate"]),
    ]),
    ("agile", &[
        ("How do you handle changing requirements in an agile team?",
            &["iteration", "backlog", "stakeholder", "prioritize"]),
    ]),
    ("scrum", &[
        ("Describe the ceremonies of a Scrum sprint.",
            &["sprint planning", "daily standup", "review", "retrospective"]),
    ]),
    ("communication", &[
        ("How would you explain a complex technical issue to a non-technical stakeholder?",
            &["simplify", "analogy", "audience", "impact"]),
    ]),
    ("leadership", &[
        ("Can you give an example of how you've demonstrated leadership in your previous roles?",
            &["initiative", "team", "decision", "outcome"]),
    ]),
    ("teamwork", &[
        ("Describe a disagreement within your team and how it was resolved.",
            &["listen", "compromise", "respect", "outcome"]),
    ]),
    ("problem solving", &[
        ("Walk me through how you debug a problem you have never seen before.",
            &["reproduce", "isolate", "hypothesis", "verify"]),
    ]),
];

#[rustfmt::skip]
const GENERIC_QUESTIONS: &[Entry] = &[
    ("Could you tell me more about your experience?",
        &["role", "project", "responsibility", "result"]),
    ("What are you looking for in your next role?",
        &["growth", "team", "challenge", "impact"]),
    ("Describe a challenging technical problem you solved recently.",
        &["problem", "approach", "trade-off", "result"]),
    ("How do you ensure the quality of the code you write?",
        &["testing", "code review", "documentation", "refactoring"]),
    ("How do you keep your technical skills up to date?",
        &["learning", "practice", "community", "reading"]),
    ("Tell me about a project you are proud of and your role in it.",
        &["goal", "contribution", "challenge", "outcome"]),
    ("How do you prioritize tasks when working on several deadlines?",
        &["priority", "communication", "estimate", "deadline"]),
    ("Describe a time you received critical feedback and how you responded.",
        &["feedback", "listen", "improve", "reflect"]),
];

/// Skill-keyed questions in declaration order plus the flat generic pool.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    by_skill: HashMap<String, Vec<Question>>,
    generic: Vec<Question>,
}

impl QuestionBank {
    /// The bank shipped with the service.
    pub fn builtin() -> Self {
        let by_skill = SKILL_QUESTIONS
            .iter()
            .map(|(skill, entries)| (skill.to_string(), entries.iter().map(to_question).collect()))
            .collect();
        let generic = GENERIC_QUESTIONS.iter().map(to_question).collect();
        Self { by_skill, generic }
    }

    /// Builds a bank from explicit parts.
    #[cfg(test)]
    pub fn from_parts(by_skill: Vec<(&str, Vec<Question>)>, generic: Vec<Question>) -> Self {
        Self {
            by_skill: by_skill
                .into_iter()
                .map(|(skill, questions)| (skill.to_string(), questions))
                .collect(),
            generic,
        }
    }

    pub fn for_skill(&self, skill: &str) -> &[Question] {
        self.by_skill.get(skill).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn generic(&self) -> &[Question] {
        &self.generic
    }
}

fn to_question((text, concepts): &Entry) -> Question {
    Question::new(text, concepts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::models::SkillCategory;
    use crate::skills::vocabulary::keywords_for;

    #[test]
    fn test_every_question_has_concepts() {
        let bank = QuestionBank::builtin();
        for questions in bank.by_skill.values() {
            for q in questions {
                assert!(!q.expected_concepts.is_empty(), "{} has no concepts", q.text);
            }
        }
        assert!(bank.generic().iter().all(|q| !q.expected_concepts.is_empty()));
    }

    #[test]
    fn test_bank_keys_are_vocabulary_keywords() {
        let bank = QuestionBank::builtin();
        for skill in bank.by_skill.keys() {
            let known = SkillCategory::ALL
                .iter()
                .any(|&c| keywords_for(c).contains(&skill.as_str()));
            assert!(known, "{skill} is not in the skill vocabulary");
        }
    }

    #[test]
    fn test_question_texts_are_unique() {
        let bank = QuestionBank::builtin();
        let mut texts: Vec<&str> = bank
            .by_skill
            .values()
            .flatten()
            .chain(bank.generic.iter())
            .map(|q| q.text.as_str())
            .collect();
        let total = texts.len();
        texts.sort_unstable();
        texts.dedup();
        assert_eq!(texts.len(), total);
    }

    #[test]
    fn test_unknown_skill_has_no_questions() {
        assert!(QuestionBank::builtin().for_skill("cobol").is_empty());
    }

    #[test]
    fn test_python_questions_in_declaration_order() {
        let bank = QuestionBank::builtin();
        let python = bank.for_skill("python");
        assert!(python.len() >= 2);
        assert!(python[0].text.contains("list and a tuple"));
        assert!(python[1].text.contains("decorators"));
    }
}
