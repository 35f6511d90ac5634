//! Configuration resolved from the process environment.
//!
//! The environment is read exactly once into an [`EnvSnapshot`]. The
//! [`ConfigResolver`] turns that snapshot into a per-provider
//! [`Resolution`] with nothing but presence checks, and [`Config`] bundles
//! the resolutions with the runtime settings. Adapters receive `&Config` at
//! construction and never touch `std::env` themselves.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;
use crate::models::ProviderKind;

// ============================================================================
// Environment Snapshot
// ============================================================================

/// Immutable view of environment variables.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Builds a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a variable's trimmed value if present and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns `(suffix, value)` for every non-empty variable named
    /// `{prefix}{suffix}` with a non-empty suffix.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.vars.iter().filter_map(move |(key, value)| {
            let suffix = key.strip_prefix(prefix)?;
            let value = value.trim();
            (!suffix.is_empty() && !value.is_empty()).then_some((suffix, value))
        })
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, CoreError>
    where
        T::Err: fmt::Display,
    {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.parse::<T>()
            .map(Some)
            .map_err(|e| CoreError::InvalidConfig {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("vars", &self.vars.len())
            .finish()
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Provider credentials. Opaque to everything but the owning adapter.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A single API token, with an optional scope (account id, team id,
    /// organization slug, cloud name).
    Token {
        /// The token.
        token: String,
        /// Provider-specific scope.
        scope: Option<String>,
    },
    /// A public/private key pair (Digest username/password).
    KeyPair {
        /// Public key.
        public_key: String,
        /// Private key.
        private_key: String,
    },
    /// An access/secret key pair bound to an account.
    SignedKey {
        /// Access key sent with each request.
        access_key: String,
        /// Secret used for signing, never sent.
        secret_key: String,
        /// Account the keys belong to.
        account_id: String,
    },
}

impl Credentials {
    /// Creates token credentials.
    pub fn token(token: impl Into<String>, scope: Option<String>) -> Self {
        Self::Token {
            token: token.into(),
            scope,
        }
    }

    /// Returns the token, for token credentials.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Returns the scope, for token credentials.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Token { scope, .. } => scope.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { scope, .. } => f
                .debug_struct("Token")
                .field("token", &"<redacted>")
                .field("scope", scope)
                .finish(),
            Self::KeyPair { public_key, .. } => f
                .debug_struct("KeyPair")
                .field("public_key", public_key)
                .field("private_key", &"<redacted>")
                .finish(),
            Self::SignedKey {
                access_key,
                account_id,
                ..
            } => f
                .debug_struct("SignedKey")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .field("account_id", account_id)
                .finish(),
        }
    }
}

/// A credential set with an account label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCredentials {
    /// Account label (`default` for single-account providers).
    pub name: String,
    /// The credentials.
    pub credentials: Credentials,
}

impl NamedCredentials {
    /// Label used for the unnamed primary account.
    pub const DEFAULT_NAME: &'static str = "default";

    /// Creates a credential set with the default label.
    pub fn primary(credentials: Credentials) -> Self {
        Self::named(Self::DEFAULT_NAME, credentials)
    }

    /// Creates a labelled credential set.
    pub fn named(name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            name: name.into(),
            credentials,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Whether a provider is configured in this environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// One or more credential sets (several for multi-account providers).
    Configured(Vec<NamedCredentials>),
    /// Nothing usable was found.
    NotConfigured {
        /// Variables that enable the provider.
        required: Vec<&'static str>,
    },
}

impl Resolution {
    /// Returns true if the provider is configured.
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Returns every credential set.
    pub fn accounts(&self) -> &[NamedCredentials] {
        match self {
            Self::Configured(accounts) => accounts,
            Self::NotConfigured { .. } => &[],
        }
    }

    /// Returns the first credential set.
    pub fn primary(&self) -> Option<&Credentials> {
        self.accounts().first().map(|a| &a.credentials)
    }

    /// Human-readable remediation message.
    pub fn remediation(&self, kind: ProviderKind) -> String {
        match self {
            Self::Configured(_) => format!("{} is configured", kind.display_name()),
            Self::NotConfigured { required } => format!(
                "{} is not configured. Set {} to enable it.",
                kind.display_name(),
                required.join(", ")
            ),
        }
    }
}

// ============================================================================
// Config Resolver
// ============================================================================

/// Resolves provider credentials from an [`EnvSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver<'a> {
    env: &'a EnvSnapshot,
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver over a snapshot.
    pub fn new(env: &'a EnvSnapshot) -> Self {
        Self { env }
    }

    /// Resolves one provider.
    pub fn resolve(&self, kind: ProviderKind) -> Resolution {
        match kind {
            ProviderKind::Cloudflare => {
                self.single_token("CLOUDFLARE_API_TOKEN", Some("CLOUDFLARE_ACCOUNT_ID"))
            }
            ProviderKind::VercelBlob => self.single_token("BLOB_READ_WRITE_TOKEN", None),
            ProviderKind::Vercel => self.vercel_accounts(),
            ProviderKind::Atlas => self.atlas(),
            ProviderKind::Neon => self.single_token("NEON_API_KEY", None),
            ProviderKind::Cloudinary => self.cloudinary(),
            ProviderKind::GitHub => self.single_token("GITHUB_TOKEN", None),
            ProviderKind::Sentry => self.scoped_token("SENTRY_AUTH_TOKEN", "SENTRY_ORG"),
            ProviderKind::UptimeRobot => self.single_token("UPTIMEROBOT_API_KEY", None),
        }
    }

    fn single_token(&self, token_var: &'static str, scope_var: Option<&str>) -> Resolution {
        match self.env.get(token_var) {
            Some(token) => {
                let scope = scope_var.and_then(|v| self.env.get(v)).map(str::to_string);
                Resolution::Configured(vec![NamedCredentials::primary(Credentials::token(
                    token, scope,
                ))])
            }
            None => Resolution::NotConfigured {
                required: vec![token_var],
            },
        }
    }

    fn scoped_token(&self, token_var: &'static str, scope_var: &'static str) -> Resolution {
        match (self.env.get(token_var), self.env.get(scope_var)) {
            (Some(token), Some(scope)) => Resolution::Configured(vec![NamedCredentials::primary(
                Credentials::token(token, Some(scope.to_string())),
            )]),
            _ => Resolution::NotConfigured {
                required: vec![token_var, scope_var],
            },
        }
    }

    fn atlas(&self) -> Resolution {
        match (self.env.get("ATLAS_PUBLIC_KEY"), self.env.get("ATLAS_PRIVATE_KEY")) {
            (Some(public_key), Some(private_key)) => {
                Resolution::Configured(vec![NamedCredentials::primary(Credentials::KeyPair {
                    public_key: public_key.to_string(),
                    private_key: private_key.to_string(),
                })])
            }
            _ => Resolution::NotConfigured {
                required: vec!["ATLAS_PUBLIC_KEY", "ATLAS_PRIVATE_KEY"],
            },
        }
    }

    fn cloudinary(&self) -> Resolution {
        let cloud = self.env.get("CLOUDINARY_CLOUD_NAME");
        let key = self.env.get("CLOUDINARY_API_KEY");
        let secret = self.env.get("CLOUDINARY_API_SECRET");

        match (cloud, key, secret) {
            (Some(cloud), Some(key), Some(secret)) => {
                Resolution::Configured(vec![NamedCredentials::primary(Credentials::SignedKey {
                    access_key: key.to_string(),
                    secret_key: secret.to_string(),
                    account_id: cloud.to_string(),
                })])
            }
            _ => Resolution::NotConfigured {
                required: vec![
                    "CLOUDINARY_CLOUD_NAME",
                    "CLOUDINARY_API_KEY",
                    "CLOUDINARY_API_SECRET",
                ],
            },
        }
    }

    /// `VERCEL_TOKEN` is the `default` account; each `VERCEL_TOKEN_<NAME>`
    /// adds an account named `<name>`.
    fn vercel_accounts(&self) -> Resolution {
        let mut accounts = Vec::new();

        if let Some(token) = self.env.get("VERCEL_TOKEN") {
            let team = self.env.get("VERCEL_TEAM_ID").map(str::to_string);
            accounts.push(NamedCredentials::primary(Credentials::token(token, team)));
        }

        let mut named: Vec<NamedCredentials> = self
            .env
            .with_prefix("VERCEL_TOKEN_")
            .map(|(suffix, token)| {
                let team = self
                    .env
                    .get(&format!("VERCEL_TEAM_ID_{suffix}"))
                    .map(str::to_string);
                NamedCredentials::named(suffix.to_ascii_lowercase(), Credentials::token(token, team))
            })
            .collect();
        named.sort_by(|a, b| a.name.cmp(&b.name));
        accounts.extend(named);

        if accounts.is_empty() {
            Resolution::NotConfigured {
                required: vec!["VERCEL_TOKEN"],
            }
        } else {
            Resolution::Configured(accounts)
        }
    }
}

// ============================================================================
// Enumeration Caps
// ============================================================================

/// Upper bounds on per-child detail fan-out, one per adapter sub-fetch.
///
/// These are rate-limit heuristics; top-level listings are never capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationCaps {
    /// Cloudflare zones enriched with DNS, SSL and analytics.
    pub cloudflare_zones: usize,
    /// R2 buckets enriched with usage.
    pub r2_buckets: usize,
    /// GitHub repositories enriched with workflow runs.
    pub github_workflow_repos: usize,
    /// GitHub repositories scanned for security alerts.
    pub github_alert_repos: usize,
    /// Security alerts kept after severity sorting.
    pub alerts_display: usize,
    /// Neon projects enriched with branches and endpoints.
    pub neon_projects: usize,
    /// Sentry projects enriched with 24h event stats.
    pub sentry_projects: usize,
    /// Databases measured per Atlas cluster.
    pub atlas_databases: usize,
    /// Recent uploads/assets listed by storage adapters.
    pub recent_uploads: usize,
}

impl Default for EnumerationCaps {
    fn default() -> Self {
        Self {
            cloudflare_zones: 5,
            r2_buckets: 10,
            github_workflow_repos: 5,
            github_alert_repos: 3,
            alerts_display: 20,
            neon_projects: 5,
            sentry_projects: 5,
            atlas_databases: 10,
            recent_uploads: 10,
        }
    }
}

impl EnumerationCaps {
    /// Applies `INFRAPULSE_CAP_<NAME>` overrides.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, CoreError> {
        let mut caps = Self::default();
        let fields: [(&str, &mut usize); 9] = [
            ("INFRAPULSE_CAP_CLOUDFLARE_ZONES", &mut caps.cloudflare_zones),
            ("INFRAPULSE_CAP_R2_BUCKETS", &mut caps.r2_buckets),
            ("INFRAPULSE_CAP_GITHUB_WORKFLOW_REPOS", &mut caps.github_workflow_repos),
            ("INFRAPULSE_CAP_GITHUB_ALERT_REPOS", &mut caps.github_alert_repos),
            ("INFRAPULSE_CAP_ALERTS_DISPLAY", &mut caps.alerts_display),
            ("INFRAPULSE_CAP_NEON_PROJECTS", &mut caps.neon_projects),
            ("INFRAPULSE_CAP_SENTRY_PROJECTS", &mut caps.sentry_projects),
            ("INFRAPULSE_CAP_ATLAS_DATABASES", &mut caps.atlas_databases),
            ("INFRAPULSE_CAP_RECENT_UPLOADS", &mut caps.recent_uploads),
        ];

        for (key, slot) in fields {
            if let Some(value) = env.parse::<usize>(key)? {
                debug!(key, value, "Enumeration cap override");
                *slot = value;
            }
        }

        Ok(caps)
    }
}

// ============================================================================
// Server Settings
// ============================================================================

/// Settings for the HTTP boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Listen address.
    pub bind: String,
    /// Admin bearer token; `None` rejects every request.
    pub admin_token: Option<String>,
}

impl ServerSettings {
    /// Default listen address.
    pub const DEFAULT_BIND: &'static str = "127.0.0.1:8787";
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: Self::DEFAULT_BIND.to_string(),
            admin_token: None,
        }
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind", &self.bind)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// Config
// ============================================================================

/// Application configuration, constructed once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    resolutions: BTreeMap<ProviderKind, Resolution>,
    /// Detail fan-out limits.
    pub caps: EnumerationCaps,
    /// Free-tier ceiling used for the object-storage quota fraction.
    pub blob_quota_bytes: u64,
    /// Timeout for every outbound HTTP request.
    pub request_timeout: Duration,
    /// Deadline for one whole adapter invocation.
    pub adapter_deadline: Duration,
    /// HTTP boundary settings.
    pub server: ServerSettings,
}

impl Config {
    /// Default object-storage ceiling (1 GiB).
    pub const DEFAULT_BLOB_QUOTA_BYTES: u64 = 1024 * 1024 * 1024;
    /// Default outbound request timeout.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default per-adapter deadline.
    pub const DEFAULT_ADAPTER_DEADLINE: Duration = Duration::from_secs(25);

    /// Builds the configuration from an environment snapshot.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self, CoreError> {
        let resolver = ConfigResolver::new(env);
        let resolutions = ProviderKind::all()
            .iter()
            .map(|kind| (*kind, resolver.resolve(*kind)))
            .collect();

        let request_timeout = env
            .parse::<u64>("INFRAPULSE_REQUEST_TIMEOUT_SECS")?
            .map_or(Self::DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);
        let adapter_deadline = env
            .parse::<u64>("INFRAPULSE_ADAPTER_DEADLINE_SECS")?
            .map_or(Self::DEFAULT_ADAPTER_DEADLINE, Duration::from_secs);

        Ok(Self {
            resolutions,
            caps: EnumerationCaps::from_env(env)?,
            blob_quota_bytes: env
                .parse::<u64>("BLOB_QUOTA_BYTES")?
                .unwrap_or(Self::DEFAULT_BLOB_QUOTA_BYTES),
            request_timeout,
            adapter_deadline,
            server: ServerSettings {
                bind: env
                    .get("INFRAPULSE_BIND")
                    .unwrap_or(ServerSettings::DEFAULT_BIND)
                    .to_string(),
                admin_token: env.get("INFRAPULSE_ADMIN_TOKEN").map(str::to_string),
            },
        })
    }

    /// Reads the process environment.
    pub fn load() -> Result<Self, CoreError> {
        Self::from_env(&EnvSnapshot::from_process())
    }

    /// Returns the resolution for one provider.
    pub fn resolution(&self, kind: ProviderKind) -> &Resolution {
        const UNRESOLVED: &Resolution = &Resolution::NotConfigured {
            required: Vec::new(),
        };
        self.resolutions.get(&kind).unwrap_or(UNRESOLVED)
    }

    /// Returns the providers that have credentials.
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        self.resolutions
            .iter()
            .filter(|(_, r)| r.is_configured())
            .map(|(k, _)| *k)
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        let resolutions = ProviderKind::all()
            .iter()
            .map(|kind| {
                (
                    *kind,
                    ConfigResolver::new(&EnvSnapshot::default()).resolve(*kind),
                )
            })
            .collect();

        Self {
            resolutions,
            caps: EnumerationCaps::default(),
            blob_quota_bytes: Self::DEFAULT_BLOB_QUOTA_BYTES,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            adapter_deadline: Self::DEFAULT_ADAPTER_DEADLINE,
            server: ServerSettings::default(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvSnapshot {
        EnvSnapshot::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_blank_values_are_absent() {
        let env = env(&[("GITHUB_TOKEN", "   ")]);
        let resolution = ConfigResolver::new(&env).resolve(ProviderKind::GitHub);
        assert_eq!(
            resolution,
            Resolution::NotConfigured {
                required: vec!["GITHUB_TOKEN"]
            }
        );
    }

    #[test]
    fn test_cloudflare_account_scope() {
        let env = env(&[
            ("CLOUDFLARE_API_TOKEN", "cf-token"),
            ("CLOUDFLARE_ACCOUNT_ID", "acc-1"),
        ]);
        let resolution = ConfigResolver::new(&env).resolve(ProviderKind::Cloudflare);
        let creds = resolution.primary().unwrap();
        assert_eq!(creds.as_token(), Some("cf-token"));
        assert_eq!(creds.scope(), Some("acc-1"));
    }

    #[test]
    fn test_vercel_multi_account() {
        let env = env(&[
            ("VERCEL_TOKEN_WORK", "w"),
            ("VERCEL_TEAM_ID_WORK", "team_w"),
            ("VERCEL_TOKEN", "d"),
            ("VERCEL_TOKEN_ARCHIVE", "a"),
        ]);
        let resolution = ConfigResolver::new(&env).resolve(ProviderKind::Vercel);
        let names: Vec<_> = resolution.accounts().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["default", "archive", "work"]);
        assert_eq!(resolution.accounts()[2].credentials.scope(), Some("team_w"));
    }

    #[test]
    fn test_vercel_variant_only() {
        let env = env(&[("VERCEL_TOKEN_SIDE", "s")]);
        let resolution = ConfigResolver::new(&env).resolve(ProviderKind::Vercel);
        assert_eq!(resolution.accounts().len(), 1);
        assert_eq!(resolution.accounts()[0].name, "side");
    }

    #[test]
    fn test_vercel_not_configured() {
        let env = env(&[("VERCEL_TEAM_ID", "team")]);
        assert!(!ConfigResolver::new(&env)
            .resolve(ProviderKind::Vercel)
            .is_configured());
    }

    #[test]
    fn test_atlas_requires_both_keys() {
        let half = env(&[("ATLAS_PUBLIC_KEY", "pub")]);
        assert!(!ConfigResolver::new(&half)
            .resolve(ProviderKind::Atlas)
            .is_configured());

        let full = env(&[("ATLAS_PUBLIC_KEY", "pub"), ("ATLAS_PRIVATE_KEY", "priv")]);
        assert!(ConfigResolver::new(&full)
            .resolve(ProviderKind::Atlas)
            .is_configured());
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials::SignedKey {
            access_key: "key".into(),
            secret_key: "super-secret".into(),
            account_id: "demo".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));

        let settings = ServerSettings {
            bind: "0.0.0.0:1".into(),
            admin_token: Some("admin-secret".into()),
        };
        assert!(!format!("{settings:?}").contains("admin-secret"));
    }

    #[test]
    fn test_cap_overrides() {
        let env = env(&[
            ("INFRAPULSE_CAP_CLOUDFLARE_ZONES", "2"),
            ("INFRAPULSE_CAP_ALERTS_DISPLAY", "50"),
        ]);
        let caps = EnumerationCaps::from_env(&env).unwrap();
        assert_eq!(caps.cloudflare_zones, 2);
        assert_eq!(caps.alerts_display, 50);
        assert_eq!(caps.r2_buckets, 10);
    }

    #[test]
    fn test_invalid_numeric_setting() {
        let env = env(&[("INFRAPULSE_REQUEST_TIMEOUT_SECS", "soon")]);
        let err = Config::from_env(&env).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_config_settings() {
        let env = env(&[
            ("BLOB_QUOTA_BYTES", "5000"),
            ("INFRAPULSE_ADMIN_TOKEN", "admin"),
            ("GITHUB_TOKEN", "gh"),
        ]);
        let config = Config::from_env(&env).unwrap();
        assert_eq!(config.blob_quota_bytes, 5000);
        assert_eq!(config.server.admin_token.as_deref(), Some("admin"));
        assert_eq!(config.server.bind, ServerSettings::DEFAULT_BIND);
        assert_eq!(config.configured_providers(), vec![ProviderKind::GitHub]);
    }
}
