/// Thaedal SMS Gateway Adapter
///
/// Translates a `(to, message)` pair into one provider-specific HTTP call.
/// The provider is chosen by configuration; the `Log` provider writes the
/// message to the log instead of calling out, which is what development and
/// CI environments use.
pub mod config;
pub mod errors;
pub mod gateway;

pub use config::{AuthKeyConfig, Msg91Config, SmsConfig, SmsProvider, TwilioConfig};
pub use errors::SmsError;
pub use gateway::SmsGateway;
