use claim_seeder::configuration::{
    SUPABASE_KEY_VARIABLE, SUPABASE_URL_VARIABLE, Settings, SupabaseCredentials, get_configuration,
};
use claim_seeder::seeder::{SeedError, SeedOutcome, report, run};
use claim_seeder::telemetry::{get_subscriber, init_subscriber};
use fake::{Fake, Faker};
use std::sync::LazyLock;
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // The sink is part of the type returned by `get_subscriber`,
    // hence the two branches.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestSeeder {
    pub supabase_server: MockServer,
    pub service_role_key: String,
    pub settings: Settings,
}

impl TestSeeder {
    /// Runs the seeder against the mock server with both credentials set.
    pub async fn seed(&self) -> Result<SeedOutcome, SeedError> {
        let base_url = self.supabase_server.uri();
        let credentials = SupabaseCredentials::from_lookup(|name| match name {
            SUPABASE_URL_VARIABLE => Some(base_url.clone()),
            SUPABASE_KEY_VARIABLE => Some(self.service_role_key.clone()),
            _ => None,
        });
        run(&self.settings, credentials).await
    }

    /// Runs the seeder with only the given variables visible.
    pub async fn seed_with(&self, vars: &[(&str, &str)]) -> Result<SeedOutcome, SeedError> {
        let credentials = SupabaseCredentials::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        });
        run(&self.settings, credentials).await
    }

    /// Body of every request the mock Supabase server received, as JSON.
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.supabase_server
            .received_requests()
            .await
            .expect("Request recording is disabled.")
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("Body is not JSON."))
            .collect()
    }
}

pub fn render(outcome: &SeedOutcome) -> String {
    let mut out = Vec::new();
    report(outcome, &mut out).expect("Failed to write the report.");
    String::from_utf8(out).expect("Report is not UTF-8.")
}

pub async fn spawn_seeder() -> TestSeeder {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let supabase_server = MockServer::start().await;

    // Keep tests fast when exercising the timeout path
    let settings = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.seeder.timeout_milliseconds = 200;
        c
    };

    TestSeeder {
        supabase_server,
        service_role_key: format!("service-role-{:016x}", Faker.fake::<u64>()),
        settings,
    }
}

