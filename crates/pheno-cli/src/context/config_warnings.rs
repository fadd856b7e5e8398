use pheno_config::PhenoConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PhenoConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PhenoConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.database.is_remote() && has_single_underscore(&env_keys, "PHENO_DATABASE") {
        warnings.push(
            "Database config appears local while PHENO_DATABASE_* env vars exist. Use double underscores (example: PHENO_DATABASE__URL)."
                .to_string(),
        );
    }

    if has_single_underscore(&env_keys, "PHENO_EXPORT") {
        warnings.push(
            "PHENO_EXPORT_* env vars are ignored. Use double underscores (example: PHENO_EXPORT__MAX_GENES)."
                .to_string(),
        );
    }

    if has_single_underscore(&env_keys, "PHENO_CACHE") {
        warnings.push(
            "PHENO_CACHE_* env vars are ignored. Use double underscores (example: PHENO_CACHE__ENABLED)."
                .to_string(),
        );
    }

    if !config.database.url.is_empty() && config.database.auth_token.is_empty() {
        warnings.push(
            "database.url is set without database.auth_token; using the local database.".to_string(),
        );
    }

    warnings
}

fn has_single_underscore(keys: &[String], prefix: &str) -> bool {
    let single = format!("{prefix}_");
    let double = format!("{prefix}__");
    keys.iter()
        .any(|key| key.starts_with(&single) && !key.starts_with(&double))
}
