use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub static_dir: String,
    /// Show fault details on the error page
    pub development: bool,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://local_library.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            development: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("development"))
                .unwrap_or(false),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in ["DATABASE_URL", "PORT", "STATIC_DIR", "APP_ENV", "SEED_DEMO"] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://local_library.db?mode=rwc");
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_dir, "public");
        assert!(!config.development);
        assert!(!config.seed_demo);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear();
        unsafe {
            env::set_var("PORT", "8080");
            env::set_var("APP_ENV", "Development");
            env::set_var("SEED_DEMO", "1");
        }
        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert!(config.development);
        assert!(config.seed_demo);

        unsafe { env::set_var("PORT", "not-a-port") };
        assert_eq!(Config::from_env().port, 3000);
        clear();
    }
}
