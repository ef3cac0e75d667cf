use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fs;

use crate::app::service::*;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Configuration of the submission service.
///
/// It is read once, from a JSON file or built in code, and handed to the
/// service at construction. Missing keys take the default values.
///
/// ```json
/// {
///   "maxUploadBytes": 5242880,
///   "sendEmail": true,
///   "senderEmail": "ranking@example.org",
///   "appPassword": "...",
///   "smtpHost": "smtp.gmail.com",
///   "smtpPort": 465,
///   "uploadDirectory": "uploads",
///   "outputDirectory": "outputs"
/// }
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    #[serde(rename = "maxUploadBytes")]
    pub max_upload_bytes: u64,
    #[serde(rename = "sendEmail")]
    pub send_email: bool,
    #[serde(rename = "senderEmail")]
    pub sender_email: Option<String>,
    #[serde(rename = "appPassword")]
    pub app_password: Option<String>,
    #[serde(rename = "smtpHost")]
    pub smtp_host: String,
    #[serde(rename = "smtpPort")]
    pub smtp_port: u16,
    #[serde(rename = "uploadDirectory")]
    pub upload_directory: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            send_email: false,
            sender_email: None,
            app_password: None,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            upload_directory: "uploads".to_string(),
            output_directory: "outputs".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_json_file(path: &str) -> ServiceResult<ServiceConfig> {
        let contents = fs::read_to_string(path).context(ReadingConfigSnafu { path })?;
        serde_json::from_str(&contents).context(ParsingConfigSnafu { path })
    }

    /// The sender address and password, if both are set and not empty.
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.sender_email.as_deref(), self.app_password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some(Credentials {
                    user: user.to_string(),
                    password: password.to_string(),
                })
            }
            _ => None,
        }
    }

    pub fn smtp_endpoint(&self) -> SmtpEndpoint {
        SmtpEndpoint {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let c: ServiceConfig = serde_json::from_str(r#"{"sendEmail": true}"#).unwrap();
        assert!(c.send_email);
        assert_eq!(c.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(c.smtp_port, 465);
        assert_eq!(c.credentials(), None);
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("service.json");
        fs::write(
            &p,
            r#"{"maxUploadBytes": 1024, "senderEmail": "a@b.org", "appPassword": "pw", "smtpHost": "mail.b.org", "smtpPort": 587}"#,
        )
        .unwrap();
        let c = ServiceConfig::from_json_file(p.to_str().unwrap()).unwrap();
        assert_eq!(c.max_upload_bytes, 1024);
        assert_eq!(
            c.smtp_endpoint(),
            SmtpEndpoint {
                host: "mail.b.org".to_string(),
                port: 587
            }
        );
        assert_eq!(c.credentials().unwrap().user, "a@b.org");
    }

    #[test]
    fn empty_password_is_not_a_credential() {
        let c = ServiceConfig {
            sender_email: Some("a@b.org".to_string()),
            app_password: Some(String::new()),
            ..ServiceConfig::default()
        };
        assert_eq!(c.credentials(), None);
    }

    #[test]
    fn bad_file() {
        assert!(matches!(
            ServiceConfig::from_json_file("/definitely/not/here.json"),
            Err(ServiceError::ReadingConfig { .. })
        ));
    }
}
