pub mod configuration;
pub mod domain;
pub mod seeder;
pub mod supabase_client;
pub mod telemetry;
