use crate::config::{AuthKeyConfig, Msg91Config, SmsConfig, SmsProvider, TwilioConfig};
use crate::errors::SmsError;

/// Stateless SMS sender. One instance is shared across the process; the
/// provider is fixed at construction time.
pub struct SmsGateway {
    config: SmsConfig,
    http_client: reqwest::Client,
}

impl SmsGateway {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> SmsProvider {
        self.config.provider
    }

    /// Send a text message to a single recipient.
    pub async fn send(&self, to: &str, message: &str) -> Result<(), SmsError> {
        match self.config.provider {
            SmsProvider::Log => {
                tracing::info!(to, message, "sms gateway in log mode, not sending");
                Ok(())
            }
            SmsProvider::Twilio => {
                let cfg = self.config.twilio.as_ref().ok_or_else(|| {
                    SmsError::Misconfigured("twilio selected but not configured".into())
                })?;
                let (url, form) = twilio_request(cfg, to, message);
                let response = self
                    .http_client
                    .post(&url)
                    .basic_auth(&cfg.account_sid, Some(&cfg.auth_token))
                    .form(&form)
                    .send()
                    .await?;
                check_status(response).await
            }
            SmsProvider::Msg91 => {
                let cfg = self.config.msg91.as_ref().ok_or_else(|| {
                    SmsError::Misconfigured("msg91 selected but not configured".into())
                })?;
                let (url, query) = msg91_request(cfg, to, message);
                let response = self.http_client.get(&url).query(&query).send().await?;
                check_status(response).await
            }
            SmsProvider::AuthKey => {
                let cfg = self.config.authkey.as_ref().ok_or_else(|| {
                    SmsError::Misconfigured("authkey selected but not configured".into())
                })?;
                let (url, query) = authkey_request(cfg, to, message);
                let response = self.http_client.get(&url).query(&query).send().await?;
                check_status(response).await
            }
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), SmsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(SmsError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Twilio Messages API: form-encoded POST, basic auth with SID/token.
fn twilio_request(cfg: &TwilioConfig, to: &str, message: &str) -> (String, Vec<(String, String)>) {
    let url = format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        cfg.base_url, cfg.account_sid
    );
    let form = vec![
        ("To".to_string(), to.to_string()),
        ("From".to_string(), cfg.from.clone()),
        ("Body".to_string(), message.to_string()),
    ];
    (url, form)
}

/// MSG91 sendhttp API: GET with authkey and route in the query string.
fn msg91_request(cfg: &Msg91Config, to: &str, message: &str) -> (String, Vec<(String, String)>) {
    let url = format!("{}/api/sendhttp.php", cfg.base_url);
    let query = vec![
        ("authkey".to_string(), cfg.auth_key.clone()),
        ("mobiles".to_string(), to.to_string()),
        ("message".to_string(), message.to_string()),
        ("sender".to_string(), cfg.sender.clone()),
        ("route".to_string(), cfg.route.clone()),
    ];
    (url, query)
}

/// AuthKey request API: GET with authkey, mobile and country code.
fn authkey_request(
    cfg: &AuthKeyConfig,
    to: &str,
    message: &str,
) -> (String, Vec<(String, String)>) {
    let url = format!("{}/request", cfg.base_url);
    let query = vec![
        ("authkey".to_string(), cfg.auth_key.clone()),
        ("mobile".to_string(), to.to_string()),
        ("country_code".to_string(), cfg.country_code.clone()),
        ("sms".to_string(), message.to_string()),
        ("sender".to_string(), cfg.sender.clone()),
    ];
    (url, query)
}
