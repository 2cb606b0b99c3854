pub mod config;
pub mod diagnosis; // Remote classification client + response parsing
pub mod models;
pub mod referral; // Letter builder, PDF rendering, export
pub mod referral_service; // Single-in-flight artifact ownership

pub use diagnosis::{DiagnosisClient, DiagnosisRequest};
pub use models::{DiagnosisEntry, Gender, PatientHistory, ReferralRequest};
pub use referral_service::{ReferralService, RenderedReferral};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding application.
///
/// Respects `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("DermaCare core v{}", config::APP_VERSION);
}
