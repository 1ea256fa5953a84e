use std::path::Path;

use hca_lib::{Config, HcaError};

/// Config file (or defaults), then `GREENPT_*` environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<Config, HcaError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<Config, HcaError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(file) => Config::from_toml_file(file).map_err(|reason| {
            HcaError::config(format!("Cannot load {}: {reason}", file.display()))
        })?,
        None => Config::default(),
    };
    config.apply_env_with(env);
    if let Err(reason) = config.validate() {
        return Err(HcaError::config(format!("Invalid config: {reason}")));
    }
    tracing::debug!(
        base_url = %config.service.base_url,
        credential = config.service.is_configured(),
        min_html_length = config.min_html_length,
        "configuration loaded"
    );
    Ok(config)
}

/// True for `--flag value` and `--flag=value`.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| match arg.strip_prefix(flag) {
        Some(rest) => rest.is_empty() || rest.starts_with('='),
        None => false,
    })
}

/// CLI value when the flag was given explicitly, config value otherwise.
pub fn resolve_min_html_length(raw_args: &[String], cli_value: usize, config: &Config) -> usize {
    if flag_present(raw_args, "--min-html-length") {
        cli_value
    } else {
        config.min_html_length
    }
}
