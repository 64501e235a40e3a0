use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,

    /// `name:pin` pairs upserted at startup. The app has no sign-up flow;
    /// this is the entire user population.
    pub seed_users: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            session_secret: env::var("SESSION_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            seed_users: env::var("SEED_USERS")
                .unwrap_or_else(|_| "Taylor:0326,Scarlett:1209".to_string())
                .split(',')
                .filter_map(|pair| {
                    let (name, pin) = pair.trim().split_once(':')?;
                    Some((name.to_string(), pin.to_string()))
                })
                .collect(),
        })
    }
}
