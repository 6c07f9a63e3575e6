use anyhow::Result;
use colored::Colorize;

use statline_core::config as core_config;
use statline_types::models::CacheBackend;
use statline_types::SyncConfig;

type ConfigUpdate = Box<dyn FnOnce(&mut SyncConfig)>;

fn parse_secs(value: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|_| anyhow::anyhow!("Invalid number of seconds: {}", value))
}

fn parse_flag(value: &str) -> Result<bool> {
    value.parse::<bool>().map_err(|_| anyhow::anyhow!("Invalid boolean: {}", value))
}

/// Parse a `config set` request up front so `update_config` only assigns.
fn parse_update(key: &str, value: &str) -> Result<ConfigUpdate> {
    let update: ConfigUpdate = match key {
        "request_timeout_secs" => {
            let v = parse_secs(value)?;
            Box::new(move |c: &mut SyncConfig| c.request_timeout_secs = v)
        },
        "cycle_deadline_secs" => {
            let v = parse_secs(value)?;
            Box::new(move |c: &mut SyncConfig| c.cycle_deadline_secs = v)
        },
        "cycle_interval_secs" => {
            let v = parse_secs(value)?;
            Box::new(move |c: &mut SyncConfig| c.cycle_interval_secs = v)
        },
        "cache_write_timeout_secs" => {
            let v = parse_secs(value)?;
            Box::new(move |c: &mut SyncConfig| c.cache_write_timeout_secs = v)
        },
        "refresh_statistics" => {
            let v = parse_flag(value)?;
            Box::new(move |c: &mut SyncConfig| c.refresh_statistics = v)
        },
        "deprioritize_degraded" => {
            let v = parse_flag(value)?;
            Box::new(move |c: &mut SyncConfig| c.deprioritize_degraded = v)
        },
        "correction.z_threshold" => {
            let v = value.parse::<f64>().map_err(|_| anyhow::anyhow!("Invalid number: {}", value))?;
            Box::new(move |c: &mut SyncConfig| c.correction.z_threshold = v)
        },
        "correction.min_samples" => {
            let v = value.parse::<usize>().map_err(|_| anyhow::anyhow!("Invalid count: {}", value))?;
            Box::new(move |c: &mut SyncConfig| c.correction.min_samples = v)
        },
        "cache.backend" => {
            let v = match value {
                "memory" => CacheBackend::Memory,
                "file" => CacheBackend::File,
                _ => anyhow::bail!("Invalid cache backend '{}' (expected memory or file)", value),
            };
            Box::new(move |c: &mut SyncConfig| c.cache.backend = v)
        },
        "enabled_leagues" => {
            let leagues: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(ToString::to_string)
                .collect();
            Box::new(move |c: &mut SyncConfig| c.enabled_leagues = leagues)
        },
        _ => anyhow::bail!("Unknown config key: {}", key),
    };
    Ok(update)
}

fn config_value(config: &SyncConfig, key: &str) -> Result<String> {
    let value = match key {
        "request_timeout_secs" => config.request_timeout_secs.to_string(),
        "cycle_deadline_secs" => config.cycle_deadline_secs.to_string(),
        "cycle_interval_secs" => config.cycle_interval_secs.to_string(),
        "cache_write_timeout_secs" => config.cache_write_timeout_secs.to_string(),
        "refresh_statistics" => config.refresh_statistics.to_string(),
        "deprioritize_degraded" => config.deprioritize_degraded.to_string(),
        "correction.z_threshold" => config.correction.z_threshold.to_string(),
        "correction.min_samples" => config.correction.min_samples.to_string(),
        "cache.backend" => backend_name(config.cache.backend).to_string(),
        "enabled_leagues" => config.enabled_leagues.join(","),
        _ => anyhow::bail!("Unknown config key: {}", key),
    };
    Ok(value)
}

fn backend_name(backend: CacheBackend) -> &'static str {
    match backend {
        CacheBackend::Memory => "memory",
        CacheBackend::File => "file",
    }
}

pub fn show_config(json: bool) -> Result<()> {
    let config = core_config::load_config()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Sync Configuration:".cyan().bold());
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!("  Cycle deadline: {}s", config.cycle_deadline_secs);
    println!("  Cycle interval: {}s", config.cycle_interval_secs);
    println!("  Cache backend: {}", backend_name(config.cache.backend));
    println!("  Outlier z-threshold: {}", config.correction.z_threshold);
    println!("  Statistics refresh: {}", config.refresh_statistics);
    let leagues = if config.enabled_leagues.is_empty() {
        "all".to_string()
    } else {
        config.enabled_leagues.join(", ")
    };
    println!("  Leagues: {leagues}");
    println!("  Rate limits: {} source keys", config.rate_limits.len());
    Ok(())
}

pub fn get_config_value(key: &str) -> Result<()> {
    let config = core_config::load_config()?;
    println!("{}", config_value(&config, key)?);
    Ok(())
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let update = parse_update(key, value)?;
    core_config::update_config(update)?;

    println!("{} Config updated: {} = {}", "✓".green(), key, value);
    Ok(())
}

pub fn show_config_path() -> Result<()> {
    let dir = core_config::get_data_dir()?;
    println!("{}", core_config::config_path_in(&dir).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_apply_updates() {
        let mut config = SyncConfig::default();
        for (key, value) in [
            ("cycle_interval_secs", "60"),
            ("refresh_statistics", "false"),
            ("cache.backend", "file"),
            ("enabled_leagues", "mlb, ncaa,"),
        ] {
            parse_update(key, value).unwrap()(&mut config);
        }

        assert_eq!(config.cycle_interval_secs, 60);
        assert!(!config.refresh_statistics);
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(config_value(&config, "enabled_leagues").unwrap(), "mlb,ncaa");
        assert_eq!(config_value(&config, "cache.backend").unwrap(), "file");
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(parse_update("proxy.port", "1").is_err());
        assert!(parse_update("request_timeout_secs", "ten").is_err());
        assert!(parse_update("cache.backend", "redis").is_err());
        assert!(config_value(&SyncConfig::default(), "nope").is_err());
    }
}
