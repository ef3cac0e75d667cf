//! Handling of ranking requests submitted through an upload form.
//!
//! A submission carries a CSV file, the weights and impacts as text and the email
//! address of the requester. The service validates the request, stores the upload
//! under a unique name, runs the ranking and then either hands back a download
//! link or sends the result table as an email attachment, depending on the
//! configuration.
//!
//! The mail transport itself is provided by the caller through [Mailer].

use chrono::Utc;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use snafu::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use topsis::{parse_weights, TopsisError};
use uuid::Uuid;

use crate::app::io_common::simplify_file_name;
use crate::app::service_config::ServiceConfig;
use crate::app::{run_ranking, RunSettings, TopsisAppError};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid file name pattern"));

pub const DOWNLOAD_PREFIX: &str = "/download/";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ServiceError {
    #[snafu(display("File too large: {size} bytes (maximum {max})"))]
    UploadTooLarge { size: u64, max: u64 },
    #[snafu(display("No file uploaded"))]
    MissingFile {},
    #[snafu(display("Invalid email format"))]
    InvalidEmail { email: String },
    #[snafu(display("Invalid weights format; provide comma-separated numbers"))]
    InvalidWeights { source: TopsisError },
    #[snafu(display("Weights and impacts count mismatch ({weights} weights, {impacts} impacts)"))]
    ListLengthMismatch { weights: usize, impacts: usize },
    #[snafu(display("Only CSV files are accepted"))]
    UnsupportedFileType { file_name: String },
    #[snafu(display("Unable to store {path}: {source}"))]
    Storage {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Processing { source: TopsisAppError },
    #[snafu(display("Server email not configured"))]
    EmailNotConfigured {},
    #[snafu(display("Unable to read result {path}: {source}"))]
    ReadingResult {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unable to read service configuration {path}: {source}"))]
    ReadingConfig {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unable to parse service configuration {path}: {source}"))]
    ParsingConfig {
        source: serde_json::Error,
        path: String,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SmtpEndpoint {
    pub host: String,
    pub port: u16,
}

#[derive(Eq, PartialEq, Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The message sent to the requester, with the result table attached.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResultEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment_content_type: String,
    pub attachment: Vec<u8>,
}

/// A mail transport.
///
/// Implementations must be usable from several requests at once.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        endpoint: &SmtpEndpoint,
        credentials: &Credentials,
        email: &ResultEmail,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// A ranking request, as received from the upload form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Submission {
    /// The name of the uploaded file as given by the client, if a file was attached.
    pub file_name: Option<String>,
    pub content: Vec<u8>,
    pub weights: String,
    pub impacts: String,
    pub email: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SubmissionOutcome {
    /// Email sending is disabled, the result can be downloaded.
    Download { url: String, path: PathBuf },
    Emailed { to: String, path: PathBuf },
    /// The ranking succeeded but the email could not be sent. The result stays downloadable.
    DeliveryFailed {
        url: String,
        path: PathBuf,
        reason: String,
    },
}

impl SubmissionOutcome {
    /// The message to show to the requester.
    pub fn message(&self) -> String {
        match self {
            SubmissionOutcome::Download { url, .. } => format!("Result ready: {}", url),
            SubmissionOutcome::Emailed { .. } => "Result sent successfully via email".to_string(),
            SubmissionOutcome::DeliveryFailed { .. } => {
                "Processing done but failed to send email".to_string()
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            SubmissionOutcome::Download { path, .. } => path,
            SubmissionOutcome::Emailed { path, .. } => path,
            SubmissionOutcome::DeliveryFailed { path, .. } => path,
        }
    }
}

/// `user@domain.tld` with no whitespace and a single `@`, matched on the whole string.
pub fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Makes a client-provided file name safe to use on the local file system.
///
/// Path separators and whitespace become underscores, every character outside
/// `[A-Za-z0-9_.-]` is dropped, and leading or trailing dots and underscores are
/// removed. The result may be empty.
pub fn sanitize_file_name(name: &str) -> String {
    let spaced = name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS_RE
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// `<UTC timestamp>_<uuid>_<name>`, unique across concurrent requests.
pub fn unique_upload_name(sanitized: &str) -> String {
    format!(
        "{}_{}_{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        Uuid::new_v4().simple(),
        sanitized
    )
}

pub fn unique_output_name() -> String {
    format!("result_{}.csv", Uuid::new_v4().simple())
}

pub struct SubmissionService {
    config: ServiceConfig,
    mailer: Box<dyn Mailer>,
}

impl SubmissionService {
    pub fn new(config: ServiceConfig, mailer: Box<dyn Mailer>) -> SubmissionService {
        SubmissionService { config, mailer }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validates, stores and ranks one submission.
    ///
    /// Errors are meant to be shown to the requester. A failure to send the email
    /// is not an error: see [SubmissionOutcome::DeliveryFailed].
    pub fn submit(&self, submission: &Submission) -> ServiceResult<SubmissionOutcome> {
        let size = submission.content.len() as u64;
        ensure!(
            size <= self.config.max_upload_bytes,
            UploadTooLargeSnafu {
                size,
                max: self.config.max_upload_bytes
            }
        );
        let client_name = match submission.file_name.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => return MissingFileSnafu {}.fail(),
        };
        ensure!(
            valid_email(&submission.email),
            InvalidEmailSnafu {
                email: submission.email.as_str()
            }
        );

        let weights = parse_weights(&submission.weights).context(InvalidWeightsSnafu {})?;
        // Empty impact items are dropped here and the engine only sees the remaining ones.
        let impacts: Vec<&str> = submission
            .impacts
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        ensure!(
            weights.len() == impacts.len(),
            ListLengthMismatchSnafu {
                weights: weights.len(),
                impacts: impacts.len()
            }
        );

        let file_name = sanitize_file_name(client_name);
        let is_csv = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        ensure!(is_csv, UnsupportedFileTypeSnafu { file_name });

        let input_path = self.store_upload(&file_name, &submission.content)?;
        let output_name = unique_output_name();
        let output_path = Path::new(&self.config.output_directory).join(&output_name);
        fs::create_dir_all(&self.config.output_directory).context(StorageSnafu {
            path: self.config.output_directory.as_str(),
        })?;

        let settings = RunSettings::new(
            &input_path.display().to_string(),
            &submission.weights,
            &impacts.join(","),
            &output_path.display().to_string(),
        );
        if let Err(e) = run_ranking(&settings) {
            error!("submit: processing of {:?} failed: {}", input_path, e);
            return Err(ServiceError::Processing { source: e });
        }
        info!("submit: result written to {:?}", output_path);

        let url = format!("{}{}", DOWNLOAD_PREFIX, output_name);
        if !self.config.send_email {
            return Ok(SubmissionOutcome::Download {
                url,
                path: output_path,
            });
        }

        let credentials = match self.config.credentials() {
            Some(c) => c,
            None => {
                error!("submit: emailing enabled but sender credentials are not set");
                return EmailNotConfiguredSnafu {}.fail();
            }
        };
        let attachment = fs::read(&output_path).context(ReadingResultSnafu {
            path: output_path.display().to_string(),
        })?;
        let email = ResultEmail {
            from: credentials.user.clone(),
            to: submission.email.clone(),
            subject: "TOPSIS Result".to_string(),
            body: "Please find the TOPSIS result attached.".to_string(),
            attachment_name: output_name,
            attachment_content_type: "text/csv".to_string(),
            attachment,
        };
        match self
            .mailer
            .send(&self.config.smtp_endpoint(), &credentials, &email)
        {
            Ok(()) => {
                info!("submit: result sent to {}", email.to);
                Ok(SubmissionOutcome::Emailed {
                    to: email.to,
                    path: output_path,
                })
            }
            Err(e) => {
                warn!("submit: failed to send email to {}: {}", email.to, e);
                Ok(SubmissionOutcome::DeliveryFailed {
                    url,
                    path: output_path,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// The path of a result file, only if `name` is a plain file name inside the output directory.
    pub fn resolve_download(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || sanitize_file_name(name) != name {
            return None;
        }
        if simplify_file_name(name).as_deref() != Some(name) {
            return None;
        }
        let p = Path::new(&self.config.output_directory).join(name);
        if p.is_file() {
            Some(p)
        } else {
            None
        }
    }

    fn store_upload(&self, file_name: &str, content: &[u8]) -> ServiceResult<PathBuf> {
        fs::create_dir_all(&self.config.upload_directory).context(StorageSnafu {
            path: self.config.upload_directory.as_str(),
        })?;
        let p = Path::new(&self.config.upload_directory).join(unique_upload_name(file_name));
        fs::write(&p, content).context(StorageSnafu {
            path: p.display().to_string(),
        })?;
        info!("store_upload: stored {:?}", p);
        Ok(p)
    }
}
