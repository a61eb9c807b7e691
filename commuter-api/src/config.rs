use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    // Supabase project
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_anon_key: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Public origin of the web app; OAuth callbacks redirect here.
    #[serde(default = "default_site_url")]
    pub site_url: String,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_port() -> u16 { 3000 }
fn default_request_timeout() -> u64 { 30 }
fn default_site_url() -> String { "http://localhost:3000".into() }
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into(), "http://localhost:3001".into()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            request_timeout_secs: default_request_timeout(),
            site_url: default_site_url(),
            allowed_origins: default_allowed_origins(),
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// Reads `COMMUTER_API_*` environment variables, e.g.
    /// `COMMUTER_API_SUPABASE_URL` or
    /// `COMMUTER_API_ALLOWED_ORIGINS=https://a.example,https://b.example`.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("COMMUTER_API")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.supabase_url.is_empty() {
            anyhow::bail!("COMMUTER_API_SUPABASE_URL must be set");
        }
        if self.supabase_anon_key.is_empty() {
            anyhow::bail!("COMMUTER_API_SUPABASE_ANON_KEY must be set");
        }
        Ok(())
    }

    /// Where signup confirmation links land.
    pub fn email_redirect_url(&self) -> String {
        format!("{}/auth/callback", self.site_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_local_frontends() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000", "http://localhost:3001"]);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn email_redirect_ignores_trailing_slash() {
        let config = AppConfig {
            site_url: "https://commuter.example/".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.email_redirect_url(), "https://commuter.example/auth/callback");
    }

    #[test]
    fn missing_backend_settings_are_rejected() {
        assert!(AppConfig::default().validate().is_err());

        let config = AppConfig {
            supabase_url: "https://project.supabase.co".into(),
            supabase_anon_key: "anon".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
