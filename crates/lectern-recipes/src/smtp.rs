//! SMTP settings
//!
//! The settings group used by the email module. The password is stored
//! encrypted under the `SmtpSettingsConfiguration` purpose.

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::secure_step::{SecureSettings, SecureSettingsStep};

pub const SMTP_SETTINGS: &str = "SmtpSettings";
pub const SMTP_PURPOSE: &str = "SmtpSettingsConfiguration";
pub const DEFAULT_PORT: u16 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmtpDeliveryMethod {
	#[default]
	Network,
	SpecifiedPickupDirectory,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmtpEncryptionMethod {
	#[default]
	None,
	#[serde(rename = "SSLTLS")]
	SslTls,
	#[serde(rename = "STARTTLS")]
	StartTls,
}

fn default_port() -> u16 {
	DEFAULT_PORT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmtpSettings {
	/// Sender address (e.g. noreply@example.com)
	pub default_sender: String,
	#[serde(default)]
	pub delivery_method: SmtpDeliveryMethod,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pickup_directory_location: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub host: Option<String>,
	#[serde(default = "default_port")]
	pub port: u16,
	#[serde(default)]
	pub encryption_method: SmtpEncryptionMethod,
	#[serde(default)]
	pub auto_select_encryption: bool,
	#[serde(default)]
	pub require_credentials: bool,
	#[serde(default)]
	pub use_default_credentials: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_name: Option<String>,
	/// Encrypted password
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
}

impl SecureSettings for SmtpSettings {
	const GROUP: &'static str = SMTP_SETTINGS;
	const PURPOSE: &'static str = SMTP_PURPOSE;
	const SENSITIVE_FIELDS: &'static [&'static str] = &["Password"];

	fn secret_slot(&mut self, field: &str) -> Option<&mut Option<String>> {
		match field {
			"Password" => Some(&mut self.password),
			_ => None,
		}
	}

	fn validate(&self) -> LtResult<()> {
		if !self.default_sender.contains('@') {
			return Err(Error::ValidationError("Invalid sender address format".into()));
		}
		if self.port == 0 {
			return Err(Error::ValidationError("Port must be between 1 and 65535".into()));
		}
		match self.delivery_method {
			SmtpDeliveryMethod::Network => {
				if self.host.as_deref().is_none_or(str::is_empty) {
					return Err(Error::ValidationError(
						"Host is required for network delivery".into(),
					));
				}
			}
			SmtpDeliveryMethod::SpecifiedPickupDirectory => {
				if self.pickup_directory_location.as_deref().is_none_or(str::is_empty) {
					return Err(Error::ValidationError(
						"Pickup directory is required for pickup directory delivery".into(),
					));
				}
			}
		}
		Ok(())
	}
}

/// Recipe step importing `SmtpSettings`
pub type SmtpSettingsStep = SecureSettingsStep<SmtpSettings>;


// vim: ts=4
