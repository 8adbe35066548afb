mod subscribe_response;
mod subscriber_email;
mod subscription_request;

pub use subscribe_response::{SubscribeResponse, WelcomeEmailStatus};
pub use subscriber_email::SubscriberEmail;
pub use subscription_request::{EMAIL_ALIASES, SubscriptionRequest};
