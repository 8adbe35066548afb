use serde::Serialize;

/// What happened to the best-effort welcome email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WelcomeEmailStatus {
    Sent,
    Failed,
    Skipped,
}

/// Body of a successful subscription.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: &'static str,
    pub welcome_email: WelcomeEmailStatus,
    pub email_error: Option<String>,
}

impl SubscribeResponse {
    pub fn subscribed(welcome_email: WelcomeEmailStatus, email_error: Option<String>) -> Self {
        Self {
            success: true,
            message: "Successfully subscribed!",
            welcome_email,
            email_error,
        }
    }
}
