#![forbid(unsafe_code)]

pub mod capture;
pub mod error;
pub mod model;
pub mod session;
pub mod time;

pub use error::Error;
pub use session::{Direction, NavigationError, Session, SessionState, Transition};
pub use time::Clock;
