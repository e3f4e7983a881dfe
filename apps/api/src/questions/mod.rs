// Question bank and selection.
// The bank is static data; selection ranks skills by frequency and pads with generic questions.

pub mod bank;
pub mod selector;

pub use bank::{Question, QuestionBank};
pub use selector::select_questions;
