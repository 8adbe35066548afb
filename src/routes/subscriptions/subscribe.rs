use actix_web::{HttpMessage, HttpRequest, HttpResponse, mime, web};
use anyhow::anyhow;

use super::errors::SubscribeError;
use crate::{
    domain::{SubscribeResponse, SubscriberEmail, SubscriptionRequest, WelcomeEmailStatus},
    email_client::{ContactRegistration, EmailClient, ResendError},
    startup::SubscriptionTargets,
    welcome_email::WelcomeEmailTemplate,
};

#[tracing::instrument(
    name = "Adding a new subscriber.",
    skip(request, body, email_client, targets, welcome_email),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    request: HttpRequest,
    body: web::Bytes,
    email_client: web::Data<EmailClient>,
    targets: web::Data<SubscriptionTargets>,
    welcome_email: web::Data<WelcomeEmailTemplate>,
) -> Result<HttpResponse, SubscribeError> {
    let form = decode_body(&request, &body);

    let Some(email) = form.email() else {
        return Err(SubscribeError::MissingEmail {
            received: form.field_names(),
        });
    };

    let email =
        SubscriberEmail::parse(email.to_owned()).map_err(SubscribeError::InvalidEmail)?;
    tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

    let Some(audience_id) = targets.audience_id.as_deref() else {
        tracing::error!("No audience is configured for new contacts.");
        return Err(SubscribeError::Configuration);
    };

    register_contact(&email_client, audience_id, &email).await?;

    let (status, email_error) = send_welcome_email(
        &email_client,
        &welcome_email,
        targets.sender_email.as_deref(),
        &email,
    )
    .await;

    Ok(HttpResponse::Ok().json(SubscribeResponse::subscribed(status, email_error)))
}

/// JSON when the caller says so (or sends an unlabelled object), url-encoded form otherwise.
fn decode_body(request: &HttpRequest, body: &[u8]) -> SubscriptionRequest {
    let is_json = match request.mime_type() {
        Ok(Some(content_type)) => {
            content_type.subtype() == mime::JSON
                || content_type.suffix().is_some_and(|suffix| suffix == mime::JSON)
        }
        Ok(None) | Err(_) => body.trim_ascii_start().starts_with(b"{"),
    };

    if is_json {
        SubscriptionRequest::from_json(body)
    } else {
        SubscriptionRequest::from_form(body)
    }
}

async fn register_contact(
    email_client: &EmailClient,
    audience_id: &str,
    email: &SubscriberEmail,
) -> Result<(), SubscribeError> {
    match email_client.create_contact(audience_id, email).await {
        Ok(ContactRegistration::Created) => Ok(()),
        Ok(ContactRegistration::AlreadyExists) => {
            tracing::info!("Subscriber is already registered, continuing.");
            Ok(())
        }
        Err(ResendError::Url(e)) => Err(SubscribeError::Unexpected(
            anyhow!(e).context("The email provider base url cannot hold a path."),
        )),
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to add contact."
            );
            Err(SubscribeError::Registration(e))
        }
    }
}

/// Never fails the request: the contact is already registered by now, so the outcome is
/// reported next to the success body instead.
#[tracing::instrument(
    name = "Sending a welcome email to a new subscriber",
    skip(email_client, template, sender)
)]
async fn send_welcome_email(
    email_client: &EmailClient,
    template: &WelcomeEmailTemplate,
    sender: Option<&str>,
    recipient: &SubscriberEmail,
) -> (WelcomeEmailStatus, Option<String>) {
    let Some(sender) = sender else {
        return (WelcomeEmailStatus::Skipped, None);
    };

    let email = match template.render(recipient) {
        Ok(email) => email,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to render the welcome email."
            );
            return (WelcomeEmailStatus::Failed, Some(e.to_string()));
        }
    };

    match email_client
        .send_email(sender, recipient, &email.subject, &email.html, &email.text)
        .await
    {
        Ok(()) => (WelcomeEmailStatus::Sent, None),
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to send the welcome email."
            );
            (WelcomeEmailStatus::Failed, Some(e.detail()))
        }
    }
}
