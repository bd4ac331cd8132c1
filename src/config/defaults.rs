//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default catalog base URL
pub const DEFAULT_BASE_URL: &str = "https://castleapp-backend-production.up.railway.app";

/// Default catalog page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default catalog request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cache validity radius in kilometers
pub const DEFAULT_CACHE_RADIUS_KM: f64 = 1.0;

/// Default delay before a silent enrichment re-poll, in seconds
pub const DEFAULT_REPOLL_DELAY_SECS: u64 = 4;

/// Default silent re-poll attempts per load
pub const DEFAULT_REPOLL_MAX_ATTEMPTS: u32 = 3;

/// Default fallback anchor latitude (Vienna)
pub const DEFAULT_FALLBACK_LAT: f64 = 48.2082;

/// Default fallback anchor longitude (Vienna)
pub const DEFAULT_FALLBACK_LON: f64 = 16.3738;

/// Default fallback anchor label
pub const DEFAULT_FALLBACK_LABEL: &str = "Vienna";

/// Default place search suggestion limit
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Countries the catalog has coverage for (ISO alpha-2, uppercase);
/// place search filters suggestions to these
pub const DEFAULT_ALLOWED_COUNTRIES: &[&str] = &[
    // Central and northern Europe
    "DE", "AT", "CH", "LI", "NL", "BE", "LU", "DK", "SE", "NO", "FI", "IS",
    // Southern and western Europe
    "ES", "FR", "IT", "PT", "GB", "IE", "AD", "MC", "MT", "SM", "VA", "GR", "CY",
    // Eastern Europe and the Balkans
    "PL", "CZ", "SK", "HU", "SI", "HR", "RO", "BG", "EE", "LV", "LT",
    // Americas
    "US", "CA", "MX", "AR", "BR", "CL", "CO", "PE", "UY", "EC", "BO", "PY", "CR", "PA",
];

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "castle-feed";
