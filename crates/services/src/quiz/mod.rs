mod progress;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use progress::QuizProgress;
pub use workflow::{QuizLoopService, QuizStep};
