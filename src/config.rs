use std::collections::HashMap;
use std::error::Error;
use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Color;
use serde::{de::Deserializer, Deserialize};

use crate::app::Action;

const CONFIG: &str = include_str!("../.config/config.yml");

#[derive(Clone, Debug, Default)]
pub struct Mapping(pub HashMap<KeyEvent, Action>);

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, Action>::deserialize(deserializer)?;

        let keybindings = parsed_map
            .into_iter()
            .map(|(key, action)| {
                parse_key_event(&key)
                    .map(|event| (event, action))
                    .map_err(serde::de::Error::custom)
            })
            .collect::<Result<HashMap<KeyEvent, Action>, D::Error>>()?;

        Ok(Mapping(keybindings))
    }
}

/// Rendering surface expectations threaded down to the embedded editor and
/// the sub-viewers. Kept as one immutable structure instead of ad hoc
/// parameters; `font_size` is carried for frontends that can apply it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub font_size: u16,
    pub indent_size: usize,
    pub key_map: String,
    pub line_wrapping: bool,
    pub debounce_millis: u64,
}

impl Default for EditorOptions {
    fn default() -> EditorOptions {
        EditorOptions {
            font_size: 11,
            indent_size: 2,
            key_map: "default".to_string(),
            line_wrapping: true,
            debounce_millis: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct TextColors {
    #[serde(deserialize_with = "de_color")]
    pub default: Color,
    #[serde(deserialize_with = "de_color")]
    pub selected: Color,
    #[serde(deserialize_with = "de_color")]
    pub unselected: Color,
}

impl Default for TextColors {
    fn default() -> TextColors {
        TextColors {
            default: Color::White,
            selected: Color::Black,
            unselected: Color::DarkGray,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SurfaceColors {
    #[serde(deserialize_with = "de_color")]
    pub selected: Color,
    #[serde(deserialize_with = "de_color")]
    pub unselected: Color,
}

impl Default for SurfaceColors {
    fn default() -> SurfaceColors {
        SurfaceColors {
            selected: Color::Blue,
            unselected: Color::DarkGray,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct StatusColors {
    #[serde(deserialize_with = "de_color")]
    pub success: Color,
    #[serde(deserialize_with = "de_color")]
    pub redirect: Color,
    #[serde(deserialize_with = "de_color")]
    pub error: Color,
}

impl Default for StatusColors {
    fn default() -> StatusColors {
        StatusColors {
            success: Color::Green,
            redirect: Color::Yellow,
            error: Color::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub text: TextColors,
    pub surface: SurfaceColors,
    pub status: StatusColors,
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mapping: Mapping,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub editor: EditorOptions,
}

pub fn parse(contents: &str) -> Result<Config, Box<dyn Error>> {
    let config = serde_yaml::from_str::<Config>(contents)?;
    Ok(config)
}

pub fn load(path: &str) -> Result<Config, Box<dyn Error>> {
    let abs_path = fs::canonicalize(path)?;
    let contents = fs::read_to_string(abs_path)?;
    parse(&contents)
}

impl Config {
    pub fn new() -> Result<Config, Box<dyn Error>> {
        let mut cfg = parse(CONFIG)?;

        for file in &["config.yaml", "config.yml"] {
            match load(file) {
                Ok(right) => {
                    cfg.mapping.0.extend(right.mapping.0.into_iter());
                    cfg.colors = right.colors;
                    cfg.editor = right.editor;
                }
                Err(e) => log::debug!("failed to load file: {}, err: {}", file, e),
            }
        }

        Ok(cfg)
    }
}

fn de_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    parse_color(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown color: {raw}")))
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let mut modifiers = KeyModifiers::empty();

    let code = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        c if c.len() == 1 => {
            // Single characters map directly; uppercase implies shift.
            let c = c.chars().next().ok_or(format!("Unable to parse {raw}"))?;
            if c.is_ascii_uppercase() {
                modifiers.insert(KeyModifiers::SHIFT);
            }
            KeyCode::Char(c)
        }
        _ => return Err(format!("Unable to parse {raw}")),
    };

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.to_lowercase();
    let s = s.trim();

    if let Some(suffix) = s.strip_prefix("color") {
        return Some(Color::Indexed(suffix.parse::<u8>().unwrap_or_default()));
    }

    if let Some(suffix) = s.strip_prefix("gray") {
        // The grayscale ramp occupies indexes 232..=255.
        let level = suffix.parse::<u8>().unwrap_or_default().min(23);
        return Some(Color::Indexed(232 + level));
    }

    if let Some(suffix) = s.strip_prefix("rgb(") {
        let rgb_string = suffix.strip_suffix(')').unwrap_or_default();
        let rgb_values: Vec<u8> = rgb_string
            .split(',')
            .map(|v| v.trim().parse::<u8>().unwrap_or(0))
            .collect();

        if let [red, green, blue] = rgb_values[..] {
            return Some(Color::Rgb(red, green, blue));
        } else {
            return None;
        }
    }

    let named = match s {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        "bold black" => 8,
        "bold red" => 9,
        "bold green" => 10,
        "bold yellow" => 11,
        "bold blue" => 12,
        "bold magenta" => 13,
        "bold cyan" => 14,
        "bold white" => 15,
        _ => return None,
    };

    Some(Color::Indexed(named))
}
