use tracing_subscriber;

use andinatrading::{config, services, AppState};

/// Datastore bootstrap: connects to MongoDB, creates the unique indexes the
/// correctness model depends on, re-hashes any pre-bcrypt credentials and
/// seeds the reference catalogues. Run once before the dispatch layer comes
/// up; safe to run again.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    let state = AppState::connect(settings)
        .await
        .expect("Failed to connect to MongoDB");

    services::db_init::ensure_indexes(&state.db)
        .await
        .expect("Failed to create indexes");

    let migrated = services::passwords::migrate_legacy_digests(&state.db)
        .await
        .expect("Legacy credential migration failed");
    if migrated > 0 {
        tracing::warn!("re-hashed {migrated} legacy plaintext credentials");
    }

    services::db_init::seed_reference_data(&state.db)
        .await
        .expect("Failed to seed reference data");

    tracing::info!(
        "datastore {} ready",
        state.settings.mongodb_db
    );
}
