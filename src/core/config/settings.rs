use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment, parse_u16,
    parse_u64, parse_usize,
};
use super::secret::load_or_create_secret_key;
use super::types::{
    AdminSettings, ApiSettings, ConfigError, CorsSettings, DatabaseSettings, QuizSettings,
    RedisSettings, RuntimeSettings, SecuritySettings, ServerHost, ServerPort, ServerSettings,
    Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("KUIS_HOST", "0.0.0.0");
        let port = env_or_default("KUIS_PORT", "8000");

        let environment =
            parse_environment(env_optional("KUIS_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("KUIS_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Kuis API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let secret_key = match env_optional("SECRET_KEY") {
            Some(value) => value,
            None => load_or_create_secret_key(),
        };

        let access_token_expire_minutes = parse_u64(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "10080"),
        )?;
        let algorithm = env_or_default("ALGORITHM", "HS256");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "kuis");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "kuis_db");
        let database_url = env_optional("DATABASE_URL");

        let redis_host = env_or_default("REDIS_HOST", "localhost");
        let redis_port = parse_u16("REDIS_PORT", env_or_default("REDIS_PORT", "6379"))?;
        let redis_db = parse_u16("REDIS_DB", env_or_default("REDIS_DB", "0"))?;
        let redis_password = env_or_default("REDIS_PASSWORD", "");

        let default_duration_seconds = parse_u64(
            "QUIZ_DEFAULT_DURATION_SECONDS",
            env_or_default("QUIZ_DEFAULT_DURATION_SECONDS", "600"),
        )?;
        let join_code_length =
            parse_usize("QUIZ_JOIN_CODE_LENGTH", env_or_default("QUIZ_JOIN_CODE_LENGTH", "6"))?;
        let leaderboard_size =
            parse_u64("LEADERBOARD_SIZE", env_or_default("LEADERBOARD_SIZE", "20"))?;

        let first_teacher_username = env_or_default("FIRST_TEACHER_USERNAME", "admin");
        let first_teacher_password = env_or_default("FIRST_TEACHER_PASSWORD", "");

        let log_level = env_or_default("KUIS_LOG_LEVEL", "info");
        let json = env_optional("KUIS_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            security: SecuritySettings { secret_key, access_token_expire_minutes, algorithm },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
            },
            redis: RedisSettings {
                host: redis_host,
                port: redis_port,
                db: redis_db,
                password: redis_password,
            },
            quiz: QuizSettings { default_duration_seconds, join_code_length, leaderboard_size },
            admin: AdminSettings { first_teacher_username, first_teacher_password },
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

    pub(crate) fn redis(&self) -> &RedisSettings {
        &self.redis
    }

    pub(crate) fn quiz(&self) -> &QuizSettings {
        &self.quiz
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.quiz.default_duration_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "QUIZ_DEFAULT_DURATION_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.quiz.join_code_length < 4 || self.quiz.join_code_length > 20 {
            return Err(ConfigError::InvalidValue {
                field: "QUIZ_JOIN_CODE_LENGTH",
                value: self.quiz.join_code_length.to_string(),
            });
        }

        if self.quiz.leaderboard_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "LEADERBOARD_SIZE",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.admin.first_teacher_password.is_empty() {
            return Err(ConfigError::MissingSecret("FIRST_TEACHER_PASSWORD"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::Settings;
    use crate::test_support;

    #[test]
    fn load_uses_defaults() {
        let _guard = test_support::env_lock();
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.server_port(), 8000);
        assert_eq!(settings.api().api_v1_str, "/api/v1");
        assert_eq!(settings.quiz().default_duration_seconds, 600);
        assert_eq!(settings.quiz().leaderboard_size, 20);
    }

    #[test]
    fn rejects_zero_duration() {
        let _guard = test_support::env_lock();
        test_support::set_test_env();
        std::env::set_var("QUIZ_DEFAULT_DURATION_SECONDS", "0");

        let result = Settings::load();
        std::env::remove_var("QUIZ_DEFAULT_DURATION_SECONDS");
        assert!(result.is_err());
    }
}
