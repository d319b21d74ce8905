use std::collections::HashMap;
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub gm_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            gm_password: "gamemaster".into(),
        }
    }
}

/// Defaults, overlaid by an optional `server.toml`, overlaid by environment
/// variables. A malformed file is ignored rather than fatal.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    settings_from(file.as_deref(), &env_lookup)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn settings_from(file: Option<&str>, env: &dyn Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.bind_addr = v.clone();
            }
            if let Some(v) = file_cfg.get("gm_password") {
                settings.gm_password = v.clone();
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("GM_PASSWORD") {
        settings.gm_password = v;
    }
    if let Some(v) = env("APP__GM_PASSWORD") {
        settings.gm_password = v;
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        let settings = settings_from(None, &|_| None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = "bind_addr = \"0.0.0.0:8080\"\ngm_password = \"hunter2\"\n";
        let settings = settings_from(Some(file), &|_| None);
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.gm_password, "hunter2");
    }

    #[test]
    fn env_overrides_file() {
        let file = "bind_addr = \"0.0.0.0:8080\"\n";
        let settings = settings_from(Some(file), &|key| {
            (key == "APP__BIND_ADDR").then(|| "127.0.0.1:9000".to_string())
        });
        assert_eq!(settings.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn malformed_file_is_ignored() {
        let settings = settings_from(Some("not toml at all ["), &|_| None);
        assert_eq!(settings, Settings::default());
    }
}
