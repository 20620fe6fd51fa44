//! Configuration system with embedded defaults and XDG-compliant paths.
//!
//! Boot sequence:
//! 1. Parse the embedded `default_config.toml` (compile-time guarantee it exists).
//! 2. Resolve `~/.config/reelview/config.toml` via the `directories` crate.
//! 3. If the user file doesn't exist, create the directory tree and write the default.
//! 4. Parse the user file (falling back to embedded defaults on any error).
//! 5. Apply the `TMDB_API_KEY` environment override.
//! 6. Store the resolved `Config` in a `OnceLock`.
//!
//! Every other module calls `config::get()` to obtain a `&'static Config`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::catalog::types::SortKey;

/// Embedded default configuration, baked into the binary at compile time.
const DEFAULT_CONFIG_STR: &str = include_str!("../default_config.toml");

/// Environment variable that overrides `catalog.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

static CONFIG: OnceLock<Config> = OnceLock::new();

// ─── Public API ─────────────────────────────────────────────────────────────

/// Load the configuration. Call once at startup, after tracing and before
/// anything reads `get()`.
pub fn init() -> Result<()> {
    let config = load()?;
    CONFIG
        .set(config)
        .map_err(|_| eyre!("Config already initialised"))?;
    Ok(())
}

/// The loaded configuration, or built-in defaults if `init()` never ran.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

// ─── Loading logic ──────────────────────────────────────────────────────────

fn load() -> Result<Config> {
    let defaults: RawConfig = toml::from_str(DEFAULT_CONFIG_STR)
        .wrap_err("BUG: failed to parse embedded default_config.toml")?;

    let user_path = config_path();
    info!("Config path: {}", user_path.display());

    ensure_config_file(&user_path)?;

    let raw = match fs::read_to_string(&user_path) {
        Ok(contents) => match toml::from_str::<RawConfig>(&contents) {
            Ok(parsed) => {
                info!("Loaded user config from {}", user_path.display());
                parsed
            }
            Err(e) => {
                warn!(
                    "Parse error in {}: {e}; falling back to defaults",
                    user_path.display()
                );
                defaults
            }
        },
        Err(e) => {
            warn!(
                "Cannot read {}: {e}; falling back to defaults",
                user_path.display()
            );
            defaults
        }
    };

    let mut config = Config::from(raw);
    config.catalog.api_key =
        resolve_api_key(config.catalog.api_key.take(), std::env::var(API_KEY_ENV).ok());
    if config.catalog.api_key.is_none() {
        warn!("No catalog API key: set {API_KEY_ENV} or catalog.api_key in the config file");
    }
    Ok(config)
}

/// A non-blank environment value wins over the file value.
fn resolve_api_key(file: Option<String>, env: Option<String>) -> Option<String> {
    let non_blank = |s: String| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };
    env.and_then(non_blank).or_else(|| file.and_then(non_blank))
}

fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "reelview")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".config/reelview/config.toml"))
}

fn ensure_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_STR)
        .wrap_err_with(|| format!("Failed to write default config to {}", path.display()))?;
    info!("Created default config at {}", path.display());
    Ok(())
}

// ─── Hex colour helper ─────────────────────────────────────────────────────

/// Parse a `#RRGGBB` hex string into an RGB `Color`.
fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Newtype that deserialises from a `"#RRGGBB"` string.
#[derive(Debug, Clone, Copy)]
pub struct HexColor(pub Color);

impl Default for HexColor {
    fn default() -> Self {
        HexColor(Color::Reset)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(HexColor(parse_hex_color(&s).unwrap_or(Color::Reset)))
    }
}

// ─── Raw TOML structures (serde targets) ────────────────────────────────────
//
// Each struct carries `#[serde(default)]` so that missing keys or entire
// sections fill in from the compiled defaults.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    general: RawGeneral,
    catalog: RawCatalog,
    search: RawSearch,
    notifications: RawNotifications,
    theme: RawTheme,
    keybindings: RawKeybindings,
}

// ── General ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawGeneral {
    tick_rate_ms: u64,
    dark_mode: bool,
    card_width: u16,
    card_height: u16,
}

impl Default for RawGeneral {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            dark_mode: true,
            card_width: 30,
            card_height: 6,
        }
    }
}

// ── Catalog ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCatalog {
    base_url: String,
    image_base_url: String,
    api_key: String,
    request_timeout_secs: u64,
    default_sort: String,
}

impl Default for RawCatalog {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".into(),
            image_base_url: "https://image.tmdb.org/t/p/w500".into(),
            api_key: String::new(),
            request_timeout_secs: 0,
            default_sort: SortKey::default().as_param().into(),
        }
    }
}

// ── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawSearch {
    debounce_ms: u64,
}

// ── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawNotifications {
    slide_speed: f32,
}

impl Default for RawNotifications {
    fn default() -> Self {
        Self { slide_speed: 0.2 }
    }
}

// ── Theme ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTheme {
    dark: RawPalette,
    light: RawPalette,
}

impl Default for RawTheme {
    fn default() -> Self {
        Self {
            dark: RawPalette::dark(),
            light: RawPalette::light(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPalette {
    accent_primary: HexColor,
    accent_secondary: HexColor,
    accent_error: HexColor,
    text_primary: HexColor,
    text_dim: HexColor,
    rating: HexColor,
    border_inactive: HexColor,
}

impl RawPalette {
    fn dark() -> Self {
        Self {
            accent_primary: HexColor(Color::Rgb(120, 220, 255)),
            accent_secondary: HexColor(Color::Rgb(180, 160, 255)),
            accent_error: HexColor(Color::Rgb(255, 110, 110)),
            text_primary: HexColor(Color::Rgb(225, 223, 240)),
            text_dim: HexColor(Color::Rgb(120, 124, 150)),
            rating: HexColor(Color::Rgb(250, 204, 21)),
            border_inactive: HexColor(Color::Rgb(75, 85, 99)),
        }
    }

    fn light() -> Self {
        Self {
            accent_primary: HexColor(Color::Rgb(20, 184, 166)),
            accent_secondary: HexColor(Color::Rgb(126, 34, 206)),
            accent_error: HexColor(Color::Rgb(220, 38, 38)),
            text_primary: HexColor(Color::Rgb(17, 24, 39)),
            text_dim: HexColor(Color::Rgb(107, 114, 128)),
            rating: HexColor(Color::Rgb(202, 138, 4)),
            border_inactive: HexColor(Color::Rgb(156, 163, 175)),
        }
    }
}

impl Default for RawPalette {
    fn default() -> Self {
        Self::dark()
    }
}

// ── Keybindings ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawKeybindings {
    quit: String,
    nav_left: String,
    nav_down: String,
    nav_up: String,
    nav_right: String,
    jump_top: String,
    jump_bottom: String,
    search: String,
    help: String,
    open_detail: String,
    sort_next: String,
    sort_prev: String,
    genre_next: String,
    genre_prev: String,
    page_next: String,
    page_prev: String,
    toggle_theme: String,
}

impl Default for RawKeybindings {
    fn default() -> Self {
        Self {
            quit: "q".into(),
            nav_left: "h".into(),
            nav_down: "j".into(),
            nav_up: "k".into(),
            nav_right: "l".into(),
            jump_top: "g".into(),
            jump_bottom: "G".into(),
            search: "/".into(),
            help: "?".into(),
            open_detail: "Enter".into(),
            sort_next: "s".into(),
            sort_prev: "S".into(),
            genre_next: "f".into(),
            genre_prev: "F".into(),
            page_next: "n".into(),
            page_prev: "p".into(),
            toggle_theme: "t".into(),
        }
    }
}

// ─── Resolved runtime config ────────────────────────────────────────────────
//
// Validated and clamped; nothing is parsed at render time.

#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub notifications: NotificationsConfig,
    pub theme: ThemeConfig,
    pub keys: KeybindingsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config::from(RawConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub tick_rate_ms: u64,
    pub dark_mode: bool,
    pub card_width: u16,
    pub card_height: u16,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: Option<String>,
    /// `None` means requests may take as long as they take.
    pub request_timeout: Option<Duration>,
    pub default_sort: SortKey,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Zero disables debouncing: every keystroke fetches.
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    pub slide_speed: f32,
}

#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub dark: Palette,
    pub light: Palette,
}

/// Resolved colour palette. Every field is a ready-to-use `Color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_error: Color,
    pub text_primary: Color,
    pub text_dim: Color,
    pub rating: Color,
    pub border_inactive: Color,
}

/// Pre-parsed keybindings, each ready for matching against a `KeyCode`.
#[derive(Debug, Clone)]
pub struct KeybindingsConfig {
    pub quit: KeyCode,
    pub nav_left: KeyCode,
    pub nav_down: KeyCode,
    pub nav_up: KeyCode,
    pub nav_right: KeyCode,
    pub jump_top: KeyCode,
    pub jump_bottom: KeyCode,
    pub search: KeyCode,
    pub help: KeyCode,
    pub open_detail: KeyCode,
    pub sort_next: KeyCode,
    pub sort_prev: KeyCode,
    pub genre_next: KeyCode,
    pub genre_prev: KeyCode,
    pub page_next: KeyCode,
    pub page_prev: KeyCode,
    pub toggle_theme: KeyCode,
}

// ─── Raw → Resolved conversion ─────────────────────────────────────────────

impl From<RawPalette> for Palette {
    fn from(raw: RawPalette) -> Self {
        Self {
            accent_primary: raw.accent_primary.0,
            accent_secondary: raw.accent_secondary.0,
            accent_error: raw.accent_error.0,
            text_primary: raw.text_primary.0,
            text_dim: raw.text_dim.0,
            rating: raw.rating.0,
            border_inactive: raw.border_inactive.0,
        }
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let default_sort = raw.catalog.default_sort.parse::<SortKey>().unwrap_or_else(|e| {
            warn!("{e} in config, using {}", SortKey::default());
            SortKey::default()
        });
        let timeout_secs = raw.catalog.request_timeout_secs.min(300);

        Self {
            general: GeneralConfig {
                tick_rate_ms: raw.general.tick_rate_ms.clamp(10, 500),
                dark_mode: raw.general.dark_mode,
                card_width: raw.general.card_width.clamp(16, 80),
                card_height: raw.general.card_height.clamp(4, 20),
            },
            catalog: CatalogConfig {
                base_url: raw.catalog.base_url,
                image_base_url: raw.catalog.image_base_url,
                api_key: resolve_api_key(Some(raw.catalog.api_key), None),
                request_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
                default_sort,
            },
            search: SearchConfig {
                debounce: Duration::from_millis(raw.search.debounce_ms.min(5_000)),
            },
            notifications: NotificationsConfig {
                slide_speed: raw.notifications.slide_speed.clamp(0.01, 1.0),
            },
            theme: ThemeConfig {
                dark: raw.theme.dark.into(),
                light: raw.theme.light.into(),
            },
            keys: KeybindingsConfig {
                quit: parse_key(&raw.keybindings.quit),
                nav_left: parse_key(&raw.keybindings.nav_left),
                nav_down: parse_key(&raw.keybindings.nav_down),
                nav_up: parse_key(&raw.keybindings.nav_up),
                nav_right: parse_key(&raw.keybindings.nav_right),
                jump_top: parse_key(&raw.keybindings.jump_top),
                jump_bottom: parse_key(&raw.keybindings.jump_bottom),
                search: parse_key(&raw.keybindings.search),
                help: parse_key(&raw.keybindings.help),
                open_detail: parse_key(&raw.keybindings.open_detail),
                sort_next: parse_key(&raw.keybindings.sort_next),
                sort_prev: parse_key(&raw.keybindings.sort_prev),
                genre_next: parse_key(&raw.keybindings.genre_next),
                genre_prev: parse_key(&raw.keybindings.genre_prev),
                page_next: parse_key(&raw.keybindings.page_next),
                page_prev: parse_key(&raw.keybindings.page_prev),
                toggle_theme: parse_key(&raw.keybindings.toggle_theme),
            },
        }
    }
}

/// Parse a human-readable key name into a crossterm `KeyCode`.
fn parse_key(s: &str) -> KeyCode {
    match s {
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "Space" => KeyCode::Char(' '),
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Delete" => KeyCode::Delete,
        "Insert" => KeyCode::Insert,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => {
                    warn!("Unknown keybinding \"{other}\" in config, ignoring");
                    KeyCode::Null
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let raw: RawConfig = toml::from_str(DEFAULT_CONFIG_STR).unwrap();
        let config = Config::from(raw);
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.api_key, None);
        assert_eq!(config.catalog.request_timeout, None);
        assert_eq!(config.search.debounce, Duration::ZERO);
        assert!(config.general.dark_mode);
        assert_eq!(config.keys.page_next, KeyCode::Char('n'));
    }

    #[test]
    fn partial_file_fills_from_defaults() {
        let raw: RawConfig = toml::from_str(
            r##"
            [catalog]
            api_key = "abc"
            request_timeout_secs = 10
            default_sort = "vote_average.desc"

            [search]
            debounce_ms = 250

            [theme.light]
            rating = "#123456"
            "##,
        )
        .unwrap();
        let config = Config::from(raw);
        assert_eq!(config.catalog.api_key.as_deref(), Some("abc"));
        assert_eq!(config.catalog.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.catalog.default_sort, SortKey::RatingDesc);
        assert_eq!(config.search.debounce, Duration::from_millis(250));
        assert_eq!(config.theme.light.rating, Color::Rgb(0x12, 0x34, 0x56));
        assert_eq!(config.general.card_width, 30);
        assert_eq!(config.keys.quit, KeyCode::Char('q'));
    }

    #[test]
    fn malformed_hex_colour_resets() {
        let raw: RawConfig =
            toml::from_str("[theme.dark]\ntext_primary = \"blue\"\nrating = \"#FACC15\"").unwrap();
        let config = Config::from(raw);
        assert_eq!(config.theme.dark.text_primary, Color::Reset);
        assert_eq!(config.theme.dark.rating, Color::Rgb(0xFA, 0xCC, 0x15));
    }

    #[test]
    fn bad_sort_key_falls_back() {
        let raw: RawConfig = toml::from_str("[catalog]\ndefault_sort = \"title.asc\"").unwrap();
        assert_eq!(Config::from(raw).catalog.default_sort, SortKey::PopularityDesc);
    }

    #[test]
    fn env_api_key_wins_when_present() {
        assert_eq!(
            resolve_api_key(Some("file".into()), Some("env".into())),
            Some("env".into())
        );
        assert_eq!(
            resolve_api_key(Some("file".into()), Some("  ".into())),
            Some("file".into())
        );
        assert_eq!(resolve_api_key(Some(String::new()), None), None);
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(parse_key("Enter"), KeyCode::Enter);
        assert_eq!(parse_key("Space"), KeyCode::Char(' '));
        assert_eq!(parse_key("G"), KeyCode::Char('G'));
        assert_eq!(parse_key("é"), KeyCode::Char('é'));
        assert_eq!(parse_key("Ctrl+x"), KeyCode::Null);
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_hex_color("#FF8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#FFF"), None);
    }
}
