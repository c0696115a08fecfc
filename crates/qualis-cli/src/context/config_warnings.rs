use qualis_config::QualisConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &QualisConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &QualisConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.sonar.is_configured() && has_env_prefix(&env_keys, "QUALIS_SONAR") {
        warnings.push(
            "No Sonar servers configured while QUALIS_SONAR* env vars exist. Use double underscores (example: QUALIS_SONAR__URLS)."
                .to_string(),
        );
    }

    if has_single_underscore_key(&env_keys, "QUALIS_DATABASE_") {
        warnings.push(
            "QUALIS_DATABASE_* env var ignored. Use double underscores (example: QUALIS_DATABASE__PATH)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter()
        .any(|key| key.starts_with(prefix) && !key[prefix.len()..].starts_with('_'))
}
