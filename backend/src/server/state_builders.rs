//! Builders wiring adapters into the handler and health state.
//!
//! A configured database URL selects the Diesel adapters; otherwise the
//! server runs on in-memory adapters, optionally seeded with directory
//! entries from a JSON file. The readiness endpoint checks whichever request
//! store was selected.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use donation_backend::domain::DonationRequestService;
use donation_backend::domain::ports::{
    DonationRequestRepository, IdentityVerifier, StoreHealth, UserDirectory,
};
use donation_backend::inbound::http::health::HealthState;
use donation_backend::inbound::http::state::HttpState;
use donation_backend::outbound::identity::{JwtIdentityVerifier, JwtSecret, JwtSecretError};
use donation_backend::outbound::memory::{
    DirectorySeedError, InMemoryDonationRequestRepository, InMemoryUserDirectory,
};
use donation_backend::outbound::persistence::{
    DbPool, DieselDonationRequestRepository, DieselStoreHealth, DieselUserDirectory,
    MigrationError, PoolConfig, PoolError, run_migrations,
};

use super::ServerSettings;

/// Reasons the server cannot assemble its adapters.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// No JWT secret was configured and an ephemeral one is not allowed.
    #[error("DONATION_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
    /// The configured JWT secret is unusable.
    #[error(transparent)]
    JwtSecret(#[from] JwtSecretError),
    /// Database migrations failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),
    /// The connection pool could not be built.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The directory seed file could not be loaded.
    #[error(transparent)]
    Seed(#[from] DirectorySeedError),
}

/// Resolve the signing secret, generating one only when permitted.
pub(crate) fn resolve_jwt_secret(
    configured: Option<&str>,
    allow_ephemeral: bool,
) -> Result<JwtSecret, StartupError> {
    match configured {
        Some(secret) => Ok(JwtSecret::new(secret.as_bytes())?),
        None if allow_ephemeral => {
            warn!("using ephemeral JWT secret; issued tokens will not verify (dev only)");
            Ok(JwtSecret::generate())
        }
        None => Err(StartupError::MissingJwtSecret),
    }
}

/// Handler state plus the health state watching the same store.
pub struct AppState {
    pub http: HttpState,
    pub health: HealthState,
}

fn app_state_for<R, D>(
    requests: Arc<R>,
    directory: Arc<D>,
    store: Arc<dyn StoreHealth>,
    identity: Arc<dyn IdentityVerifier>,
) -> AppState
where
    R: DonationRequestRepository + 'static,
    D: UserDirectory + 'static,
{
    let service = Arc::new(DonationRequestService::new(
        requests,
        directory,
        Arc::new(DefaultClock),
    ));
    AppState {
        http: HttpState::new(service.clone(), service, identity),
        health: HealthState::new(store),
    }
}

fn in_memory_directory(settings: &ServerSettings) -> Result<InMemoryUserDirectory, StartupError> {
    match &settings.seed_directory_path {
        Some(path) => {
            let directory = InMemoryUserDirectory::from_seed_file(path)?;
            info!(path = %path.display(), "user directory seeded");
            Ok(directory)
        }
        None => {
            warn!("no directory seed configured; every caller is unknown");
            Ok(InMemoryUserDirectory::default())
        }
    }
}

/// Build handler and health state from settings.
///
/// # Errors
/// Returns [`StartupError`] when the secret, database or seed file is
/// unusable.
pub async fn build_app_state(settings: &ServerSettings) -> Result<AppState, StartupError> {
    let secret = resolve_jwt_secret(
        settings.jwt_secret.as_deref(),
        cfg!(debug_assertions) || settings.allow_ephemeral_jwt_secret,
    )?;
    let identity: Arc<dyn IdentityVerifier> = Arc::new(JwtIdentityVerifier::new(&secret));

    match &settings.database_url {
        Some(url) => {
            run_migrations(url).await?;
            let pool = DbPool::new(
                PoolConfig::new(url.as_str()).with_max_size(settings.db_max_connections()),
            )
            .await?;
            info!(max_connections = settings.db_max_connections(), "using PostgreSQL adapters");
            Ok(app_state_for(
                Arc::new(DieselDonationRequestRepository::new(pool.clone())),
                Arc::new(DieselUserDirectory::new(pool.clone())),
                Arc::new(DieselStoreHealth::new(pool)),
                identity,
            ))
        }
        None => {
            warn!("no database configured; requests are kept in memory");
            let requests = Arc::new(InMemoryDonationRequestRepository::default());
            Ok(app_state_for(
                Arc::clone(&requests),
                Arc::new(in_memory_directory(settings)?),
                requests,
                identity,
            ))
        }
    }
}
