mod catalog;
mod ids;
mod ledger;
mod question;
mod response;
mod submission;

pub use catalog::{Catalog, CatalogError};
pub use ids::{EmptyUserId, OptionId, ParseIdError, QuestionId, SessionId, UserId};
pub use ledger::ResponseLedger;
pub use question::{AnswerOption, Question, QuestionError, QuestionKind};
pub use response::{Response, ResponseError, ResponsePayload};
pub use submission::SubmissionPayload;
