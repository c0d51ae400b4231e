// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load and validate a configuration file, printing a short summary.
pub fn run_validate(config_path: &Path) -> Result<()> {
    log::info!("Validating {}", config_path.display());

    let loaded = Config::load(config_path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration is invalid: {}", e);
            return Err(e);
        }
    };

    print!("{}", render_summary(&config));
    Ok(())
}

fn render_summary(config: &Config) -> String {
    let mut out = String::from("Configuration OK\n");
    out.push_str(&format!("    origin: {}\n", config.client.origin));
    out.push_str(&format!("    index: {}\n", config.client.index_path));
    out.push_str(&format!(
        "    probe timeout: {}ms, fetch timeout: {}s\n",
        config.client.probe_timeout_ms, config.client.fetch_timeout_secs
    ));
    out.push_str(&format!(
        "    cache: {} (window {}s, refresh after {}s)\n",
        config.cache.store_dir.display(),
        config.cache.duration_secs,
        config.cache.refresh_after_secs
    ));
    out.push_str(&format!("    sources: {}\n", config.sources.len()));
    for source in &config.sources {
        let base = if source.is_local() {
            "(same origin)"
        } else {
            source.base_url.as_str()
        };
        out.push_str(&format!(
            "        {}. {} {}\n",
            source.priority, source.name, base
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_good_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("postfeed.toml");
        fs::write(
            &path,
            r#"
[client]
origin = "https://blog.example.com"

[cache]
duration_secs = 120
refresh_after_secs = 60
"#,
        )
        .unwrap();

        run_validate(&path).unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("postfeed.toml");
        fs::write(
            &path,
            r#"
[cache]
duration_secs = 60
refresh_after_secs = 120
"#,
        )
        .unwrap();

        assert!(run_validate(&path).is_err());
    }

    #[test]
    fn test_summary_marks_local_source() {
        let text = render_summary(&Config::default());
        assert!(text.starts_with("Configuration OK"));
        assert!(text.contains("1. Local (same origin)"));
    }
}
