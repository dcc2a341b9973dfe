//! Environment-driven process configuration, read once at startup.

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC signing secret for session tokens.
    pub token_secret: String,

    /// Whether issued cookies carry the `Secure` attribute (on in
    /// production, off for plain-HTTP development).
    pub cookie_secure: bool,

    /// Listen address.
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let token_secret = std::env::var("TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("TOKEN_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Self {
            token_secret,
            cookie_secure,
            bind_addr,
        }
    }
}
