use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// One-time code settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    pub ttl_minutes: i64,
}

/// Outbound email settings. Without an API key codes are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub email: EmailConfig,
    pub password_min_length: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "chefscircle".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "chefscircle-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };
        let otp = OtpConfig {
            ttl_minutes: env_parse("OTP_TTL_MINUTES").unwrap_or(10),
        };
        let email = EmailConfig {
            api_key: std::env::var("RESEND_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            api_url: std::env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".into()),
            from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "ChefsCircle <onboarding@resend.dev>".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            otp,
            email,
            password_min_length: env_parse("PASSWORD_MIN_LENGTH").unwrap_or(6),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
