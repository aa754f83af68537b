use std::time::Duration;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const BOOKING_API_URL: &str = "https://mockapi.io/api/v1/ambulance-bookings";
const HOSPITAL_API_URL: &str = "https://mockapi.io/api/v1/hospitals";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const SEARCH_LATENCY_MS: u64 = 500;
const HTTP_TIMEOUT_SECS: u64 = 10;
const GEOCODER_USER_AGENT: &str = "emergency-booking-api/0.1";
const SESSION_TTL_SECS: u64 = 30 * 60;
const SESSION_SWEEP_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub booking_api_url: String,
    pub hospital_api_url: String,
    pub nominatim_url: String,
    /// Delay applied before ambulance search results resolve.
    pub search_latency: Duration,
    pub http_timeout: Duration,
    pub geocoder_user_agent: String,
    /// Sessions untouched for this long are discarded.
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            booking_api_url: BOOKING_API_URL.to_string(),
            hospital_api_url: HOSPITAL_API_URL.to_string(),
            nominatim_url: NOMINATIM_URL.to_string(),
            search_latency: Duration::from_millis(SEARCH_LATENCY_MS),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            geocoder_user_agent: GEOCODER_USER_AGENT.to_string(),
            session_ttl: Duration::from_secs(SESSION_TTL_SECS),
            session_sweep_interval: Duration::from_secs(SESSION_SWEEP_SECS),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            booking_api_url: std::env::var("BOOKING_API_URL").unwrap_or(defaults.booking_api_url),
            hospital_api_url: std::env::var("HOSPITAL_API_URL")
                .unwrap_or(defaults.hospital_api_url),
            nominatim_url: std::env::var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            search_latency: std::env::var("SEARCH_LATENCY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_latency),
            http_timeout: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            geocoder_user_agent: std::env::var("GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder_user_agent),
            session_ttl: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
            session_sweep_interval: std::env::var("SESSION_SWEEP_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_sweep_interval),
        }
    }
}
