use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment, parse_u16,
    parse_u64,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, RuntimeSettings, SecuritySettings,
    ServerHost, ServerPort, ServerSettings, Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("GABARITO_HOST", "0.0.0.0");
        let port = env_or_default("GABARITO_PORT", "8000");

        let environment =
            parse_environment(env_optional("GABARITO_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("GABARITO_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Gabarito API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let public_base_url = env_or_default("PUBLIC_BASE_URL", "http://localhost:8000");

        let secret_key = match env_optional("SECRET_KEY") {
            Some(value) => value,
            None => load_or_create_secret_key(),
        };

        // 10080 minutes = 7 days, the session token lifetime.
        let access_token_expire_minutes = parse_u64(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "10080"),
        )?;
        let algorithm = env_or_default("ALGORITHM", "HS256");
        let auth_rate_limit =
            parse_u64("AUTH_RATE_LIMIT", env_or_default("AUTH_RATE_LIMIT", "10"))?;
        let auth_rate_window_seconds = parse_u64(
            "AUTH_RATE_WINDOW_SECONDS",
            env_or_default("AUTH_RATE_WINDOW_SECONDS", "60"),
        )?;

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "gabarito");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "gabarito_db");
        let database_url = env_optional("DATABASE_URL");

        let log_level = env_or_default("GABARITO_LOG_LEVEL", "info");
        let json = env_optional("GABARITO_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, public_base_url },
            security: SecuritySettings {
                secret_key,
                access_token_expire_minutes,
                algorithm,
                auth_rate_limit,
                auth_rate_window_seconds,
            },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.auth_rate_window_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "AUTH_RATE_WINDOW_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.api.public_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "PUBLIC_BASE_URL",
                value: String::from("<empty>"),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn load_defaults_to_seven_day_tokens() {
        let _guard = crate::test_support::env_lock();
        std::env::set_var("SECRET_KEY", "test-secret");
        std::env::remove_var("ACCESS_TOKEN_EXPIRE_MINUTES");
        std::env::remove_var("GABARITO_ENV");
        std::env::remove_var("GABARITO_STRICT_CONFIG");

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.security().access_token_expire_minutes, 10080);
        assert_eq!(settings.security().algorithm, "HS256");
    }

    #[test]
    fn server_addr_joins_host_and_port() {
        let _guard = crate::test_support::env_lock();
        std::env::set_var("SECRET_KEY", "test-secret");
        std::env::set_var("GABARITO_HOST", "127.0.0.1");
        std::env::set_var("GABARITO_PORT", "9999");
        std::env::remove_var("GABARITO_ENV");
        std::env::remove_var("GABARITO_STRICT_CONFIG");

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.server_addr(), "127.0.0.1:9999");

        std::env::remove_var("GABARITO_HOST");
        std::env::remove_var("GABARITO_PORT");
    }
}
