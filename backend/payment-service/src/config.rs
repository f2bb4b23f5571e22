use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub razorpay: RazorpayConfig,
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_receipt_prefix")]
    pub receipt_prefix: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_api_base() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_receipt_prefix() -> String {
    "thaedal_".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("database.url", "postgres://localhost/thaedal")?
            .set_default("database.max_connections", 5)?
            .set_default("razorpay.key_id", "")?
            .set_default("razorpay.key_secret", "")?
            .set_default("reconcile.page_size", 100)?
            .set_default("reconcile.receipt_prefix", "thaedal_")?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let config: RazorpayConfig = serde_json::from_value(serde_json::json!({
            "key_id": "rzp_test_1",
            "key_secret": "secret"
        }))
        .unwrap();
        assert_eq!(config.api_base, "https://api.razorpay.com");

        let reconcile: ReconcileConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(reconcile.page_size, 100);
        assert_eq!(reconcile.receipt_prefix, "thaedal_");
    }
}
