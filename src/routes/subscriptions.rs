mod errors;
mod preflight;
mod subscribe;

pub use errors::SubscribeError;
pub use preflight::{method_not_allowed, preflight};
pub use subscribe::subscribe;
