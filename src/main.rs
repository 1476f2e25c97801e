use anyhow::Context;
use subtrack::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("subtrack".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    if let Err(e) = run().await {
        tracing::error!(error.cause_chain = ?e, error.message = %e, "Application stopped");
        return Err(e);
    }

    Ok(())
}

async fn run() -> Result<(), anyhow::Error> {
    let configuration = get_configuration().context("Failed to read configuration")?;
    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
