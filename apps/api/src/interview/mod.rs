// Interview session: the conversational state machine and its HTTP surface.
// Flow: collecting_profile → confirming_skills → interviewing → complete.
// One InterviewSession per client session, owned by the SessionStore.

pub mod handlers;
pub mod intent;
pub mod scoring;
pub mod session;
pub mod store;

pub use scoring::{aggregate_score, Rating};
pub use session::{AnswerRecord, InterviewSession, Phase, ProfileStep, Reply, SessionContext};
pub use store::SessionStore;
