use std::fmt::{Debug, Display};

use subscribe_hook::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use tokio::task::JoinError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("subscribe_hook".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration()?;

    let app = tokio::spawn(Application::build(config).await?.run_until_stopped());
    report_exit("API", app.await);

    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "{} failed",
            task_name
            )
        }
        Err(e) => {
            tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "{} task failed to complete",
            task_name
            )
        }
    }
}
