//! Question classification and rule-based short-answer extraction.
//!
//! The extractor is deliberately naive: a fixed cascade of regex rules over a
//! single selected sentence, conditioned on the question type. Its misfires
//! are part of what the surrounding pipeline exists to demonstrate.

pub mod classify;
pub mod extract;
pub mod normalize;

pub use classify::{detect_question_type, QuestionType};
pub use extract::extract_short_answer;
pub use normalize::normalize;
