use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub provider: ProviderConfig,
    pub domain: DomainConfig,
    pub roster: RosterConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the DNS/email-routing provider API.
    /// Overridable so tests can point at a mock server.
    #[serde(default = "default_provider_api_base")]
    pub api_base: String,
    pub zone_id: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    /// Root domain under which student subdomains are created.
    pub root: String,
    /// Hostname used as CNAME content. Scheme and trailing slashes are
    /// stripped on load so operators can paste a full URL.
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_roster_path")]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialPair {
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Comma-separated identity codes that require per-identity Basic auth
    /// on mutating endpoints.
    #[serde(default)]
    pub protected_ids: String,
    /// Explicit identity → credential pair map. An identity listed in
    /// `protected_ids` but absent here is a server misconfiguration
    /// surfaced per-request, never a silent bypass.
    #[serde(default)]
    pub identity_credentials: HashMap<String, CredentialPair>,
    #[serde(default)]
    pub admin_user: String,
    #[serde(default)]
    pub admin_pass: String,
}

impl AuthConfig {
    pub fn protected_ids(&self) -> Vec<String> {
        self.protected_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_protected(&self, id: &str) -> bool {
        self.protected_ids
            .split(',')
            .map(str::trim)
            .any(|p| !p.is_empty() && p == id.trim())
    }

    pub fn identity_credentials(&self, id: &str) -> Option<&CredentialPair> {
        self.identity_credentials.get(id)
    }

    pub fn admin_credentials(&self) -> Option<CredentialPair> {
        if self.admin_user.is_empty() || self.admin_pass.is_empty() {
            return None;
        }
        Some(CredentialPair {
            user: self.admin_user.clone(),
            pass: self.admin_pass.clone(),
        })
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_api_port() -> u16 {
    3000
}
fn default_db_path() -> String {
    "./portal.db".to_string()
}
fn default_provider_api_base() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}
fn default_roster_path() -> String {
    "./data/roster.json".to_string()
}

/// Strip scheme and trailing slashes from a CNAME target host.
pub fn normalize_target(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    s.trim_end_matches('/').to_string()
}

pub fn validate(cfg: &Config) -> Result<()> {
    if cfg.domain.root.trim().is_empty() {
        anyhow::bail!("CONFIG ERROR: domain.root must be set (PORTAL__DOMAIN__ROOT)");
    }
    if cfg.domain.target.trim().is_empty() {
        anyhow::bail!("CONFIG ERROR: domain.target must be set (PORTAL__DOMAIN__TARGET)");
    }
    if cfg.provider.zone_id.trim().is_empty() || cfg.provider.api_token.trim().is_empty() {
        anyhow::bail!(
            "CONFIG ERROR: provider.zone_id and provider.api_token must be set \
             (PORTAL__PROVIDER__ZONE_ID / PORTAL__PROVIDER__API_TOKEN)"
        );
    }

    // Protected identities without configured credentials are reported at
    // startup but only fail the individual request (InternalConfig).
    for id in cfg.auth.protected_ids() {
        if cfg.auth.identity_credentials(&id).is_none() {
            tracing::warn!(
                "Protected identity '{}' has no configured credential pair; \
                 mutating requests for it will fail with a server error",
                id
            );
        }
    }

    if cfg.auth.admin_credentials().is_none() {
        tracing::warn!("Admin credentials not configured; admin endpoints will be unavailable");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}

pub fn load() -> Result<Config> {
    let cfg: Config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
        .set_default("api.bind", "0.0.0.0")?
        .set_default("api.port", 3000)?
        .set_default("database.path", "./portal.db")?
        .set_default("provider.api_base", "https://api.cloudflare.com/client/v4")?
        .set_default("provider.zone_id", "")?
        .set_default("provider.api_token", "")?
        .set_default("domain.root", "")?
        .set_default("domain.target", "")?
        .set_default("roster.path", "./data/roster.json")?
        .set_default("auth.protected_ids", "")?
        .set_default("auth.admin_user", "")?
        .set_default("auth.admin_pass", "")?
        .build()?
        .try_deserialize()?;

    validate(&cfg)?;

    let mut cfg = cfg;
    cfg.domain.target = normalize_target(&cfg.domain.target);

    Ok(cfg)
}
