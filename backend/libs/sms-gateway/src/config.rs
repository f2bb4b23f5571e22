use serde::Deserialize;

/// Which upstream carries the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsProvider {
    /// No outbound call; message is written to the log.
    Log,
    Twilio,
    Msg91,
    AuthKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_provider")]
    pub provider: SmsProvider,
    pub twilio: Option<TwilioConfig>,
    pub msg91: Option<Msg91Config>,
    pub authkey: Option<AuthKeyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    #[serde(default = "default_twilio_base")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Msg91Config {
    pub auth_key: String,
    pub sender: String,
    #[serde(default = "default_msg91_route")]
    pub route: String,
    #[serde(default = "default_msg91_base")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthKeyConfig {
    pub auth_key: String,
    pub sender: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_authkey_base")]
    pub base_url: String,
}

fn default_provider() -> SmsProvider {
    SmsProvider::Log
}

fn default_twilio_base() -> String {
    "https://api.twilio.com".to_string()
}

fn default_msg91_base() -> String {
    "https://api.msg91.com".to_string()
}

// Transactional route.
fn default_msg91_route() -> String {
    "4".to_string()
}

fn default_authkey_base() -> String {
    "https://api.authkey.io".to_string()
}

fn default_country_code() -> String {
    "91".to_string()
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Log,
            twilio: None,
            msg91: None,
            authkey: None,
        }
    }
}
