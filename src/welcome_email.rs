use tera::{Context, Tera};

use crate::configuration::WelcomeEmailSettings;
use crate::domain::SubscriberEmail;

/// A rendered welcome email, ready to hand to the email client.
#[derive(Debug)]
pub struct WelcomeEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders the welcome email from the configured tera templates.
///
/// Templates are compiled once at start-up. Which templates get rendered is part of the
/// configuration, so swapping the email design never touches the subscribe handler.
pub struct WelcomeEmailTemplate {
    tera: Tera,
    subject: String,
    logo_url: String,
    html_template: String,
    text_template: String,
}

impl WelcomeEmailTemplate {
    pub fn new(settings: &WelcomeEmailSettings) -> Result<Self, tera::Error> {
        let glob = format!("{}/**/*", settings.templates_dir.trim_end_matches('/'));
        let tera = Tera::new(&glob)?;

        let names: Vec<&str> = tera.get_template_names().collect();
        for template in [&settings.html_template, &settings.text_template] {
            if !names.contains(&template.as_str()) {
                return Err(tera::Error::msg(format!(
                    "Template {template} not found in {glob}"
                )));
            }
        }

        Ok(Self {
            tera,
            subject: settings.subject.clone(),
            logo_url: settings.logo_url.clone(),
            html_template: settings.html_template.clone(),
            text_template: settings.text_template.clone(),
        })
    }

    pub fn render(&self, recipient: &SubscriberEmail) -> Result<WelcomeEmail, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("logo_url", &self.logo_url);
        ctx.insert("email", recipient.as_ref());

        Ok(WelcomeEmail {
            subject: self.subject.clone(),
            html: self.tera.render(&self.html_template, &ctx)?,
            text: self.tera.render(&self.text_template, &ctx)?,
        })
    }
}
