use std::time::Duration;

use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::email_client::EmailClient;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub welcome_email: WelcomeEmailSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub allowed_origin: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub api_key: SecretString,
    pub audience_id: Option<String>,
    pub sender_email: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl EmailClientSettings {
    pub fn client(&self) -> Result<EmailClient, anyhow::Error> {
        EmailClient::new(&self.base_url, self.api_key.clone(), self.timeout())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The destination list, if one is configured. Blank values count as missing.
    pub fn audience(&self) -> Option<&str> {
        non_blank(self.audience_id.as_deref())
    }

    /// The `from` address of the welcome email. Blank values count as missing.
    pub fn sender(&self) -> Option<&str> {
        non_blank(self.sender_email.as_deref())
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct WelcomeEmailSettings {
    pub subject: String,
    pub logo_url: String,
    pub templates_dir: String,
    pub html_template: String,
    pub text_template: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

/// Unprefixed variable names accepted for the provider settings, mapped onto settings keys.
const LEGACY_VARIABLES: [(&str, &str); 4] = [
    ("email_client.api_key", "RESEND_API_KEY"),
    ("email_client.audience_id", "RESEND_AUDIENCE_ID"),
    ("email_client.sender_email", "FROM_EMAIL"),
    ("welcome_email.logo_url", "LOGO_URL"),
];

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine current directory: {e}")))?;
    let conf_dir = base_path.join("configuration");
    let env: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let mut builder = config::Config::builder()
        .add_source(config::File::from(conf_dir.join("base")).required(true))
        .add_source(config::File::from(conf_dir.join(env.as_str())).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_"),
        );

    for (key, variable) in LEGACY_VARIABLES {
        builder = builder.set_override_option(key, std::env::var(variable).ok())?;
    }

    builder.build()?.try_deserialize::<Settings>()
}
