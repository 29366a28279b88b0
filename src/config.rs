use crate::{
    auth::AuthKey,
    media::imagekit::ImageKitConfig,
    services::{
        UploadPolicy,
        policy::{DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_VIDEO_BYTES},
    },
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::{env, str::FromStr};

const DEFAULT_UPLOAD_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";
const DEFAULT_MAX_REQUEST_BYTES: usize = 512 * 1024 * 1024;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth_key: AuthKey,
    pub auth_issuer: Option<String>,
    pub imagekit: ImageKitConfig,
    pub upload_policy: UploadPolicy,
    pub max_request_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Personal media drive API")]
pub struct Args {
    /// Host to bind to (overrides DRIVE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides DRIVE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides DRIVE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        let cfg = Self::from_env(args)?;
        Ok((cfg, migrate))
    }

    fn from_env(args: Args) -> Result<Self> {
        let env_host = env::var("DRIVE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = parse_var("DRIVE_PORT", 3000u16)?;
        let env_db =
            env::var("DRIVE_DATABASE_URL").unwrap_or_else(|_| "sqlite://./data/drive.db".into());

        let auth_key = match (
            optional_var("DRIVE_AUTH_SECRET"),
            optional_var("DRIVE_AUTH_PUBLIC_KEY"),
        ) {
            (Some(secret), _) => AuthKey::Secret(secret),
            (None, Some(pem)) => AuthKey::PublicKeyPem(pem),
            (None, None) => bail!("either DRIVE_AUTH_SECRET or DRIVE_AUTH_PUBLIC_KEY must be set"),
        };

        let imagekit = ImageKitConfig {
            public_key: required_var("IMAGEKIT_PUBLIC_KEY")?,
            private_key: required_var("IMAGEKIT_PRIVATE_KEY")?,
            url_endpoint: required_var("IMAGEKIT_URL_ENDPOINT")?,
            upload_url: optional_var("IMAGEKIT_UPLOAD_URL")
                .unwrap_or_else(|| DEFAULT_UPLOAD_URL.into()),
        };

        let upload_policy = UploadPolicy {
            max_image_bytes: parse_var("DRIVE_MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
            max_video_bytes: parse_var("DRIVE_MAX_VIDEO_BYTES", DEFAULT_MAX_VIDEO_BYTES)?,
        };

        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            auth_key,
            auth_issuer: optional_var("DRIVE_AUTH_ISSUER"),
            imagekit,
            upload_policy,
            max_request_bytes: parse_var("DRIVE_MAX_REQUEST_BYTES", DEFAULT_MAX_REQUEST_BYTES)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name).with_context(|| format!("missing required environment variable {}", name))
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", name, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", name)),
    }
}
