//! Daemon configuration loaded from TOML (spec.md §6 "Persisted state",
//! expanded per the Session Controller's ambient config section).

use edgelink_types::ScreenEdge;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub screens: Vec<ScreenConfig>,
}

/// Daemon network and runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_true")]
    pub discovery: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            discovery_port: default_discovery_port(),
            bind: default_bind(),
            discovery: true,
            log_level: default_log_level(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
        }
    }
}

/// Machine identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Free-form platform label sent in `hello` (spec.md §3 "Peer").
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            platform: default_platform(),
        }
    }
}

/// Input subsystem settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_release_hotkey")]
    pub release_hotkey: Vec<String>,
    /// Whether the local pointer plane uses bottom-up (mathematical) Y.
    /// See spec.md §9 "Open question: Y-axis inversion".
    #[serde(default)]
    pub bottom_up_y: bool,
    /// Scaling applied to REMOTE-mode pointer deltas (spec.md §4.5.3).
    #[serde(default = "default_pointer_gain")]
    pub pointer_gain: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            release_hotkey: default_release_hotkey(),
            bottom_up_y: false,
            pointer_gain: default_pointer_gain(),
        }
    }
}

/// Clipboard subsystem settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_clipboard_size")]
    pub max_size: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: default_max_clipboard_size(),
        }
    }
}

/// A statically configured candidate peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub edge: ScreenEdge,
    /// Set on clean disconnect from the last address actually used, read
    /// back at startup (spec.md §6 "Persisted state" permits this; no
    /// format compatibility is required across versions).
    #[serde(default)]
    pub last_peer: Option<String>,
}

fn default_port() -> u16 {
    edgelink_protocol::DEFAULT_PORT
}

fn default_discovery_port() -> u16 {
    edgelink_discovery::DISCOVERY_PORT
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "edgelink".to_string())
}

fn default_platform() -> String {
    std::env::consts::OS.to_string()
}

fn default_release_hotkey() -> Vec<String> {
    vec!["LeftCtrl".to_string(), "LeftAlt".to_string(), "KeyM".to_string()]
}

fn default_pointer_gain() -> f64 {
    1.0
}

fn default_max_clipboard_size() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

fn default_screen_width() -> u32 {
    1920
}

fn default_screen_height() -> u32 {
    1080
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains(&format!("port = {}", edgelink_protocol::DEFAULT_PORT)));
    }

    #[test]
    fn parse_example_config() {
        let toml_str = r#"
[daemon]
port = 52525
discovery_port = 52526
bind = "0.0.0.0"
discovery = true
log_level = "info"

[identity]
name = "workstation-left"
platform = "linux"

[input]
release_hotkey = ["LeftCtrl", "LeftAlt", "KeyM"]
bottom_up_y = false
pointer_gain = 1.0

[clipboard]
enabled = true
max_size = 10485760

[[screens]]
name = "laptop-right"
address = "192.168.1.42:52525"
edge = "right"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.daemon.port, 52525);
        assert_eq!(config.identity.name, "workstation-left");
        assert_eq!(config.screens.len(), 1);
        assert_eq!(config.screens[0].name, "laptop-right");
        assert_eq!(config.screens[0].edge, ScreenEdge::Right);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.daemon.port, edgelink_protocol::DEFAULT_PORT);
        assert!(config.clipboard.enabled);
        assert!(config.screens.is_empty());
    }
}
