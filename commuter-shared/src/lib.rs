pub mod backend;
pub mod clients;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod session;
pub mod types;

pub use backend::{Backend, BackendError, BackendResult, Filter, TableQuery};
pub use errors::{AppError, AppResult, ErrorCode};
pub use extract::ApiJson;
pub use session::{SessionCheck, SessionScope, SessionState};
pub use types::*;
