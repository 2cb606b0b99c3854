use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "DermaCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base URL of the diagnostic service (local development backend).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Environment variable overriding the diagnostic service base URL.
pub const API_BASE_URL_ENV: &str = "DERMACARE_API_URL";

/// Resolve the diagnostic service base URL.
///
/// Reads `DERMACARE_API_URL`, falling back to the documented default.
pub fn api_base_url() -> String {
    std::env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    "info,dermacare_lib=debug".to_string()
}

/// Get the application data directory
/// ~/DermaCare/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("DermaCare")
}

/// Get the directory exported referral letters are written to
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Referring-clinic letterhead printed on every referral letter.
///
/// Injected at startup; defaults mirror the stock letter template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClinicInfo {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub physician: String,
    pub physician_role: String,
}

impl Default for ClinicInfo {
    fn default() -> Self {
        Self {
            name: "ABC GP Clinic".into(),
            address_lines: vec![
                "123 Healthcare Way".into(),
                "Medical District, MD 12345".into(),
            ],
            phone: "(+65) 1234 5678".into(),
            physician: "John Doe".into(),
            physician_role: "General Practitioner".into(),
        }
    }
}
