use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "RePlas";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest payload a QR code can carry (version 40, numeric mode).
pub const MAX_QR_PAYLOAD_BYTES: usize = 7089;

/// Substring that marks a URL as pointing at the platform itself.
pub const DEFAULT_PLATFORM_DOMAIN: &str = "replas";

/// Get the application data directory (~/.replas/).
///
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".replas")
}

/// Path of the ledger database.
pub fn ledger_db_path() -> PathBuf {
    app_data_dir().join("ledger.db")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "replas=debug,info"
    } else {
        "replas=info,warn"
    }
}

/// Scanner settings: the trust boundary for auto-navigation and the
/// payload size cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// URLs containing this substring are treated as internal.
    pub platform_domain: String,
    /// Additional host substrings treated as internal.
    pub internal_hosts: Vec<String>,
    /// Payloads longer than this are rejected before classification.
    pub max_payload_bytes: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            platform_domain: DEFAULT_PLATFORM_DOMAIN.into(),
            internal_hosts: vec!["localhost".into()],
            max_payload_bytes: MAX_QR_PAYLOAD_BYTES,
        }
    }
}

impl ScannerConfig {
    /// Defaults overridden by `REPLAS_PLATFORM_DOMAIN` and
    /// `REPLAS_MAX_PAYLOAD_BYTES`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(domain) = lookup("REPLAS_PLATFORM_DOMAIN") {
            let domain = domain.trim();
            if !domain.is_empty() {
                config.platform_domain = domain.to_string();
            }
        }

        if let Some(raw) = lookup("REPLAS_MAX_PAYLOAD_BYTES") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_payload_bytes = n,
                _ => tracing::warn!(value = %raw, "Ignoring invalid REPLAS_MAX_PAYLOAD_BYTES"),
            }
        }

        config
    }

    /// Whether `url` may be navigated to without asking the user.
    pub fn is_internal_url(&self, url: &str) -> bool {
        if url.starts_with('/') && !url.starts_with("//") {
            return true;
        }
        if url.contains(self.platform_domain.as_str()) {
            return true;
        }
        self.internal_hosts
            .iter()
            .any(|host| url.contains(host.as_str()))
    }
}
