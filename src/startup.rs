use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::email_client::EmailClient;
use crate::routes::{health_check, method_not_allowed, preflight, subscribe};
use crate::welcome_email::WelcomeEmailTemplate;

pub struct Application {
    port: u16,
    server: Server,
}

/// Where new subscribers go: the provider audience and the welcome email sender.
/// Either may be missing; the subscribe handler decides what that means.
pub struct SubscriptionTargets {
    pub audience_id: Option<String>,
    pub sender_email: Option<String>,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let email_client = config.email_client.client()?;
        let welcome_email = WelcomeEmailTemplate::new(&config.welcome_email)
            .context("Failed to load the welcome email templates.")?;

        let targets = SubscriptionTargets {
            audience_id: config.email_client.audience().map(String::from),
            sender_email: config.email_client.sender().map(String::from),
        };
        if targets.audience_id.is_none() {
            tracing::warn!("No audience configured, every subscription will fail.");
        }
        if targets.sender_email.is_none() {
            tracing::info!("No sender configured, welcome emails are disabled.");
        }

        let address = format!("{}:{}", config.app.host, config.app.port);
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {address}."))?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            email_client,
            targets,
            welcome_email,
            config.app.allowed_origin,
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    email_client: EmailClient,
    targets: SubscriptionTargets,
    welcome_email: WelcomeEmailTemplate,
    allowed_origin: String,
) -> Result<Server, anyhow::Error> {
    let email_client = web::Data::new(email_client);
    let targets = web::Data::new(targets);
    let welcome_email = web::Data::new(welcome_email);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                DefaultHeaders::new()
                    .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed_origin.clone()))
                    .add((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
                    .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")),
            )
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::resource("/api/subscribe")
                    .route(web::post().to(subscribe))
                    .route(web::method(Method::OPTIONS).to(preflight))
                    .default_service(web::to(method_not_allowed)),
            )
            .app_data(email_client.clone())
            .app_data(targets.clone())
            .app_data(welcome_email.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
