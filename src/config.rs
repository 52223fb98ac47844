use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub theme: Theme,
    pub settings: Settings,
    pub keybindings: Keybindings,
}

/// Where the integration backend lives and how to talk to it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    /// API request timeout in seconds
    pub api_timeout: u64,
    /// Endpoint returning projects with their requirement lists
    pub requirements_endpoint: String,
    /// Sent as a bearer token when set
    pub auth_token: Option<String>,
}

/// The signed-in user the view acts for
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: String,
    pub org_id: String,
    /// Feature flag gating the import view
    pub azure_devops_enabled: bool,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows per page on startup, snapped to the allowed page sizes
    pub default_page_size: usize,
    /// Seconds before a notification disappears
    pub status_timeout: u64,
}

/// Customizable keybindings (single character keys)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    // Navigation
    pub down: char,
    pub up: char,
    pub prev_page: char,
    pub next_page: char,
    // Table
    pub toggle_row: char,
    pub toggle_all: char,
    pub sort: char,
    pub page_size: char,
    // Actions
    pub import: char,
    pub reload: char,
    pub help: char,
    pub quit: char,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub border: String,
    pub border_active: String,
    pub selected_bg: String,
    pub header_bg: String,
    pub text: String,
    pub text_muted: String,
    pub highlight: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_timeout: 30,
            requirements_endpoint: "/api/getProjectRequirement".to_string(),
            auth_token: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            status_timeout: 5,
        }
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            // Navigation (vim-style)
            down: 'j',
            up: 'k',
            prev_page: 'h',
            next_page: 'l',
            // Table
            toggle_row: ' ',
            toggle_all: 'a',
            sort: 's',
            page_size: 'z',
            // Actions
            import: 'i',
            reload: 'r',
            help: '?',
            quit: 'q',
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // One Dark color scheme
            border: "#5c6370".to_string(),        // Gray
            border_active: "#61afef".to_string(), // Blue
            selected_bg: "#2c323c".to_string(),   // Dark gray
            header_bg: "#21303f".to_string(),     // Pale blue on dark
            text: "#abb2bf".to_string(),          // Light gray
            text_muted: "#5c6370".to_string(),    // Muted gray
            highlight: "#61afef".to_string(),     // Blue
            success: "#98c379".to_string(),       // Green
            warning: "#e5c07b".to_string(),       // Yellow
            error: "#e06c75".to_string(),         // Red
        }
    }
}

impl Config {
    /// Load from an explicit path, or search the usual locations.
    ///
    /// Search order: `~/.config/lazyimport/config.toml`, the platform config
    /// dir, then `~/.lazyimport.toml`. Falls back to defaults when none exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        for path in Self::candidate_paths() {
            if path.is_file() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        // XDG first, the standard on Linux and commonly used on macOS too
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("lazyimport").join("config.toml"));
        }
        // ~/Library/Application Support/ on macOS
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("lazyimport").join("config.toml"));
        }
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".lazyimport.toml"));
        }
        paths
    }
}

impl Theme {
    pub fn parse_color(&self, hex: &str) -> ratatui::style::Color {
        // Parse hex color string (e.g., "#61afef")
        if hex.starts_with('#') && hex.len() == 7 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[1..3], 16),
                u8::from_str_radix(&hex[3..5], 16),
                u8::from_str_radix(&hex[5..7], 16),
            ) {
                return ratatui::style::Color::Rgb(r, g, b);
            }
        }
        // Fallback to white if parsing fails
        ratatui::style::Color::White
    }
}
