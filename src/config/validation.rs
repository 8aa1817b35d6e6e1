// Configuration validation module
// Semantic checks that the type system cannot express

use super::types::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

const LOG_FORMATS: &[&str] = &["text", "json"];
const ACCESS_LOG_FORMATS: &[&str] = &["combined", "common", "json"];

impl Config {
    /// Check every field and return all violations at once
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::invalid("server.port", 0, "must be non-zero"));
        }
        if self.server.workers == Some(0) {
            errors.push(ConfigError::invalid(
                "server.workers",
                0,
                "must be at least 1 when set",
            ));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            errors.push(ConfigError::invalid(
                "logging.format",
                &self.logging.format,
                "expected text or json",
            ));
        }
        if !ACCESS_LOG_FORMATS.contains(&self.logging.access_log_format.as_str()) {
            errors.push(ConfigError::invalid(
                "logging.access_log_format",
                &self.logging.access_log_format,
                "expected combined, common or json",
            ));
        }

        let performance = &self.performance;
        if performance.read_timeout == 0 {
            errors.push(ConfigError::invalid(
                "performance.read_timeout",
                0,
                "must be non-zero",
            ));
        }
        if performance.write_timeout == 0 {
            errors.push(ConfigError::invalid(
                "performance.write_timeout",
                0,
                "must be non-zero",
            ));
        }

        if self.http.max_body_size == 0 {
            errors.push(ConfigError::invalid(
                "http.max_body_size",
                0,
                "must be non-zero",
            ));
        }

        let providers = &self.providers;
        check_template(&mut errors, "providers.geo_url", &providers.geo_url, &["{ip}"]);
        check_template(
            &mut errors,
            "providers.detail_url",
            &providers.detail_url,
            &["{lat}", "{lng}"],
        );
        if providers.connect_timeout == 0 {
            errors.push(ConfigError::invalid(
                "providers.connect_timeout",
                0,
                "must be non-zero",
            ));
        }
        if providers.request_timeout == 0 {
            errors.push(ConfigError::invalid(
                "providers.request_timeout",
                0,
                "must be non-zero",
            ));
        } else if providers.request_timeout.saturating_mul(2) >= performance.write_timeout {
            // a lookup makes two sequential provider calls within one request budget
            errors.push(ConfigError::invalid(
                "providers.request_timeout",
                providers.request_timeout,
                "two provider calls must fit within performance.write_timeout",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_template(
    errors: &mut Vec<ConfigError>,
    field: &'static str,
    template: &str,
    placeholders: &[&str],
) {
    if !(template.starts_with("http://") || template.starts_with("https://")) {
        errors.push(ConfigError::invalid(
            field,
            template,
            "must be an http:// or https:// URL",
        ));
    }
    if placeholders.iter().any(|p| !template.contains(p)) {
        errors.push(ConfigError::invalid(
            field,
            template,
            "missing a required placeholder",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(errors: &[ConfigError]) -> Vec<&'static str> {
        errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::InvalidField { field, .. } => Some(*field),
                ConfigError::Load(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::from_toml("").unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_collects_all_violations() {
        let cfg = Config::from_toml(
            r#"
            [server]
            port = 0
            workers = 0

            [logging]
            format = "xml"
            access_log_format = "fancy"

            [http]
            max_body_size = 0
            "#,
        )
        .unwrap();
        let errors = cfg.validate().unwrap_err();
        assert_eq!(
            field_names(&errors),
            vec![
                "server.port",
                "server.workers",
                "logging.format",
                "logging.access_log_format",
                "http.max_body_size",
            ]
        );
    }

    #[test]
    fn test_template_placeholders_required() {
        let cfg = Config::from_toml(
            r#"
            [providers]
            geo_url = "https://geo.example/lookup"
            detail_url = "https://geo.example/rev/{lat}"
            "#,
        )
        .unwrap();
        let errors = cfg.validate().unwrap_err();
        assert_eq!(
            field_names(&errors),
            vec!["providers.geo_url", "providers.detail_url"]
        );
    }

    #[test]
    fn test_template_scheme_and_timeouts() {
        let cfg = Config::from_toml(
            r#"
            [providers]
            geo_url = "ftp://geo.example/{ip}"
            connect_timeout = 0
            request_timeout = 0
            "#,
        )
        .unwrap();
        let errors = cfg.validate().unwrap_err();
        assert_eq!(
            field_names(&errors),
            vec![
                "providers.geo_url",
                "providers.connect_timeout",
                "providers.request_timeout",
            ]
        );
        assert!(errors[0].to_string().contains("ftp://geo.example/{ip}"));
    }

    #[test]
    fn test_provider_calls_must_fit_request_budget() {
        let cfg = Config::from_toml(
            r#"
            [performance]
            read_timeout = 1
            write_timeout = 1

            [providers]
            request_timeout = 5
            "#,
        )
        .unwrap();
        let errors = cfg.validate().unwrap_err();
        assert_eq!(field_names(&errors), vec!["providers.request_timeout"]);

        let cfg = Config::from_toml(
            r#"
            [performance]
            write_timeout = 20

            [providers]
            request_timeout = 10
            "#,
        )
        .unwrap();
        assert_eq!(
            field_names(&cfg.validate().unwrap_err()),
            vec!["providers.request_timeout"]
        );

        let cfg = Config::from_toml("[performance]\nwrite_timeout = 21").unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_server_timeouts_rejected() {
        let cfg = Config::from_toml(
            r#"
            [performance]
            read_timeout = 0
            write_timeout = 0
            "#,
        )
        .unwrap();
        assert_eq!(
            field_names(&cfg.validate().unwrap_err()),
            vec![
                "performance.read_timeout",
                "performance.write_timeout",
                "providers.request_timeout",
            ]
        );
    }
}
