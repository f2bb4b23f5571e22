use serde::Deserialize;
use sms_gateway::SmsConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub onesignal: OneSignalConfig,
    #[serde(default)]
    pub fcm: Option<FcmConfig>,
    #[serde(default)]
    pub sms: SmsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: i32,
    #[serde(default = "default_lockout_minutes")]
    pub lockout_duration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneSignalConfig {
    pub app_id: String,
    pub rest_api_key: String,
}

/// Device-token push is optional; without this section the push-by-device
/// endpoint reports itself unconfigured.
#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    pub project_id: String,
    pub credentials_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_max_login_attempts() -> i32 {
    5
}

fn default_lockout_minutes() -> i64 {
    15
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/thaedal_admin")?
            .set_default("database.max_connections", 10)?
            .set_default("jwt.secret", "development-secret-change-in-production")?
            .set_default("jwt.expiry_hours", 24)?
            .set_default("security.max_login_attempts", 5)?
            .set_default("security.lockout_duration_minutes", 15)?
            .set_default("onesignal.app_id", "")?
            .set_default("onesignal.rest_api_key", "")?
            .set_default("sms.provider", "log")?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
