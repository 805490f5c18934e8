pub mod binder;
pub mod inflight;
pub mod middleware;

pub use binder::{AuthAction, AuthBinder, AuthOutcome, CredentialsForm};
pub use inflight::InFlight;
pub use middleware::{auth_middleware, CurrentUser};
