use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::SubscriberEmail;

/// Client for a Resend-compatible provider: audience contacts and transactional emails.
#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: Url,
    api_key: SecretString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRegistration {
    Created,
    AlreadyExists,
}

#[derive(thiserror::Error, Debug)]
pub enum ResendError {
    #[error("Email provider responded with {status}: {detail}")]
    Api { status: StatusCode, detail: String },
    #[error("Failed to reach the email provider.")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid email provider url: {0}")]
    Url(String),
}

impl ResendError {
    /// Diagnostic text safe to hand back to the caller.
    pub fn detail(&self) -> String {
        match self {
            ResendError::Api { detail, .. } => detail.clone(),
            ResendError::Transport(e) if e.is_timeout() => {
                "Request to the email provider timed out.".into()
            }
            ResendError::Transport(e) if e.is_connect() => {
                "Could not connect to the email provider.".into()
            }
            // reqwest errors embed the request url, which carries the audience id.
            ResendError::Transport(_) => self.to_string(),
            ResendError::Url(e) => e.clone(),
        }
    }
}

#[derive(Serialize)]
struct CreateContactRequest<'a> {
    email: &'a str,
    unsubscribed: bool,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
    name: Option<String>,
}

impl EmailClient {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(base_url).context("Failed parsing base email api url.")?;

        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            base_url,
            api_key,
        })
    }

    #[tracing::instrument(
        name = "Registering contact with the email provider",
        skip(self, audience_id)
    )]
    pub async fn create_contact(
        &self,
        audience_id: &str,
        email: &SubscriberEmail,
    ) -> Result<ContactRegistration, ResendError> {
        let url = self.route(&["audiences", audience_id, "contacts"])?;
        let body = CreateContactRequest {
            email: email.as_ref(),
            unsubscribed: false,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        match check_status(response).await {
            Ok(()) => Ok(ContactRegistration::Created),
            Err(ResendError::Api { status, detail })
                if status == StatusCode::CONFLICT || detail.contains("already exists") =>
            {
                Ok(ContactRegistration::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(
        name = "Sending an email through the email provider",
        skip(self, html_content, text_content)
    )]
    pub async fn send_email(
        &self,
        sender: &str,
        recipient: &SubscriberEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), ResendError> {
        let url = self.route(&["emails"])?;
        let body = SendEmailRequest {
            from: sender,
            to: vec![recipient.as_ref()],
            subject,
            html: html_content,
            text: text_content,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        check_status(response).await
    }

    /// Appends `segments` to the base path, percent-encoding each one as a single segment.
    fn route(&self, segments: &[&str]) -> Result<Url, ResendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResendError::Url(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn check_status(response: Response) -> Result<(), ResendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await?;
    Err(ResendError::Api {
        status,
        detail: error_detail(&body),
    })
}

/// Provider `message`, else its error `name`, else the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(ProviderErrorBody {
            message: Some(message),
            ..
        }) if !message.is_empty() => message,
        Ok(ProviderErrorBody {
            name: Some(name), ..
        }) if !name.is_empty() => name,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => "Unknown error".into(),
    }
}
