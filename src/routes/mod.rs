mod health_check;
mod helpers;
mod subscriptions;

pub use health_check::health_check;
pub use helpers::error_chain_fmt;
pub use subscriptions::{SubscribeError, method_not_allowed, preflight, subscribe};
