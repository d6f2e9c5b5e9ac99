use claim_seeder::configuration::{SupabaseCredentials, get_configuration};
use claim_seeder::seeder::{report, run};
use claim_seeder::telemetry::{get_subscriber, init_subscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A local `.env` is optional; variables already set in the process win.
    dotenvy::dotenv().ok();

    let configuration = get_configuration()?;
    let subscriber = get_subscriber(
        "claim_seeder".into(),
        configuration.seeder.log_level.clone(),
        std::io::stderr,
    );
    init_subscriber(subscriber);

    let outcome = run(&configuration, SupabaseCredentials::from_env()).await?;
    report(&outcome, &mut std::io::stdout().lock())?;
    Ok(())
}
