use crate::utils::error::{Result, UiError};
use ratatui::style::{Color, Modifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 색상 테마
///
/// 컴포넌트가 사용하는 모든 스타일 토큰의 묶음입니다.
/// 한 번 만들어지면 변경되지 않으며, 확장은 새 값을 반환합니다.
/// TOML 파일에서 로드하거나 미리 정의된 테마(`light_theme`, `dark_theme`)를 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ColorTokens,
    pub spacing: SpacingTokens,
    pub typography: Typography,
    /// 호스트가 추가한 커스텀 색상 토큰
    #[serde(default)]
    pub custom: BTreeMap<String, ColorDef>,
}

/// 색상 토큰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTokens {
    // 기본/강조
    pub primary: ColorDef,
    pub on_primary: ColorDef,

    // 배경/전경
    pub background: ColorDef,
    pub surface: ColorDef,
    pub text: ColorDef,
    pub text_secondary: ColorDef,
    pub placeholder: ColorDef,

    // 테두리
    pub border: ColorDef,
    pub border_focused: ColorDef,

    // 비활성
    pub disabled: ColorDef,
    pub disabled_text: ColorDef,

    // 선택/오버레이
    pub selected_bg: ColorDef,
    pub selected_fg: ColorDef,
    pub overlay_bg: ColorDef,

    // 상태
    pub error: ColorDef,
    pub success: ColorDef,
}

/// 간격 토큰 (터미널 셀 단위)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingTokens {
    pub padding_x: u16,
    pub padding_y: u16,
    pub gap: u16,
    /// 드롭다운 오버레이에 한 번에 보이는 최대 항목 수
    pub overlay_max_height: u16,
}

/// 글꼴 토큰
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typography {
    pub label: FontDef,
    pub placeholder: FontDef,
    pub title: FontDef,
    pub rounded_borders: bool,
}

/// 글꼴 속성 (터미널에서 표현 가능한 범위)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontDef {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontDef {
    pub const fn plain() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub const fn bold() -> Self {
        Self {
            bold: true,
            italic: false,
            underline: false,
        }
    }

    pub const fn italic() -> Self {
        Self {
            bold: false,
            italic: true,
            underline: false,
        }
    }

    pub fn to_modifier(self) -> Modifier {
        let mut modifier = Modifier::empty();
        if self.bold {
            modifier |= Modifier::BOLD;
        }
        if self.italic {
            modifier |= Modifier::ITALIC;
        }
        if self.underline {
            modifier |= Modifier::UNDERLINED;
        }
        modifier
    }
}

/// 색상 정의 (TOML 직렬화/역직렬화 지원)
///
/// Hex 문자열("#1e1e1e") 또는 색상 이름("Red")을 지원합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorDef {
    Hex(String),
    Named(String),
}

impl ColorDef {
    /// ColorDef를 ratatui의 Color로 변환 (해석 불가 시 Reset)
    pub fn to_color(&self) -> Color {
        self.try_to_color().unwrap_or(Color::Reset)
    }

    pub fn try_to_color(&self) -> Option<Color> {
        match self {
            ColorDef::Hex(hex) => parse_hex_color(hex),
            ColorDef::Named(name) => parse_named_color(name),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            ColorDef::Hex(s) | ColorDef::Named(s) => s,
        }
    }
}

impl From<&str> for ColorDef {
    fn from(s: &str) -> Self {
        if s.starts_with('#') {
            ColorDef::Hex(s.to_string())
        } else {
            ColorDef::Named(s.to_string())
        }
    }
}

impl From<String> for ColorDef {
    fn from(s: String) -> Self {
        ColorDef::from(s.as_str())
    }
}

impl From<ColorDef> for String {
    fn from(def: ColorDef) -> Self {
        match def {
            ColorDef::Hex(s) | ColorDef::Named(s) => s,
        }
    }
}

/// Hex 색상 문자열을 Color로 파싱
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// 색상 이름을 Color로 파싱
fn parse_named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        _ => return None,
    };
    Some(color)
}

/// 토큰 조회 결과
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Color(Color),
    Spacing(u16),
    Font(FontDef),
    Flag(bool),
}

/// Light 테마 (기본)
pub fn light_theme() -> Theme {
    Theme {
        name: "light".to_string(),
        colors: ColorTokens {
            primary: "#0078d4".into(),
            on_primary: "#ffffff".into(),

            background: "#ffffff".into(),
            surface: "#f3f3f3".into(),
            text: "#1e1e1e".into(),
            text_secondary: "#5a5a5a".into(),
            placeholder: "#8a8a8a".into(),

            border: "#cccccc".into(),
            border_focused: "#0078d4".into(),

            disabled: "#e0e0e0".into(),
            disabled_text: "#a0a0a0".into(),

            selected_bg: "#add6ff".into(),
            selected_fg: "#000000".into(),
            overlay_bg: "#ffffff".into(),

            error: "#e51400".into(),
            success: "#107c10".into(),
        },
        spacing: SpacingTokens {
            padding_x: 1,
            padding_y: 0,
            gap: 1,
            overlay_max_height: 6,
        },
        typography: Typography {
            label: FontDef::bold(),
            placeholder: FontDef::italic(),
            title: FontDef::bold(),
            rounded_borders: true,
        },
        custom: BTreeMap::new(),
    }
}

/// Dark 테마
pub fn dark_theme() -> Theme {
    Theme {
        name: "dark".to_string(),
        colors: ColorTokens {
            primary: "#0078d4".into(),
            on_primary: "#ffffff".into(),

            background: "#1e1e1e".into(),
            surface: "#2d2d30".into(),
            text: "#d4d4d4".into(),
            text_secondary: "#9d9d9d".into(),
            placeholder: "#6a6a6a".into(),

            border: "#3c3c3c".into(),
            border_focused: "#569cd6".into(),

            disabled: "#3a3a3a".into(),
            disabled_text: "#646464".into(),

            selected_bg: "#0078d4".into(),
            selected_fg: "#ffffff".into(),
            overlay_bg: "#252526".into(),

            error: "#f44747".into(),
            success: "#4ec9b0".into(),
        },
        spacing: SpacingTokens {
            padding_x: 1,
            padding_y: 0,
            gap: 1,
            overlay_max_height: 6,
        },
        typography: Typography {
            label: FontDef::bold(),
            placeholder: FontDef::italic(),
            title: FontDef::bold(),
            rounded_borders: true,
        },
        custom: BTreeMap::new(),
    }
}

impl Default for Theme {
    fn default() -> Self {
        light_theme()
    }
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        self.name == "dark"
    }

    /// 이름 변경 (새 테마 반환)
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 커스텀 색상 토큰 추가 (새 테마 반환)
    pub fn with_custom(mut self, name: impl Into<String>, color: impl Into<ColorDef>) -> Self {
        self.custom.insert(name.into(), color.into());
        self
    }

    /// "섹션.키" 형식으로 토큰 조회
    ///
    /// 예: `colors.primary`, `spacing.gap`, `typography.label`, `custom.brand`
    pub fn token(&self, key: &str) -> Option<TokenValue> {
        let (section, name) = key.split_once('.')?;
        match section {
            "colors" => self.color_def(name).map(|def| TokenValue::Color(def.to_color())),
            "spacing" => {
                let s = &self.spacing;
                let value = match name {
                    "padding_x" => s.padding_x,
                    "padding_y" => s.padding_y,
                    "gap" => s.gap,
                    "overlay_max_height" => s.overlay_max_height,
                    _ => return None,
                };
                Some(TokenValue::Spacing(value))
            }
            "typography" => {
                let t = &self.typography;
                match name {
                    "label" => Some(TokenValue::Font(t.label)),
                    "placeholder" => Some(TokenValue::Font(t.placeholder)),
                    "title" => Some(TokenValue::Font(t.title)),
                    "rounded_borders" => Some(TokenValue::Flag(t.rounded_borders)),
                    _ => None,
                }
            }
            "custom" => self
                .custom
                .get(name)
                .map(|def| TokenValue::Color(def.to_color())),
            _ => None,
        }
    }

    /// 색상 토큰 조회 (Color로 변환)
    pub fn color(&self, key: &str) -> Option<Color> {
        match self.token(key)? {
            TokenValue::Color(color) => Some(color),
            _ => None,
        }
    }

    fn color_def(&self, name: &str) -> Option<&ColorDef> {
        let c = &self.colors;
        let def = match name {
            "primary" => &c.primary,
            "on_primary" => &c.on_primary,
            "background" => &c.background,
            "surface" => &c.surface,
            "text" => &c.text,
            "text_secondary" => &c.text_secondary,
            "placeholder" => &c.placeholder,
            "border" => &c.border,
            "border_focused" => &c.border_focused,
            "disabled" => &c.disabled,
            "disabled_text" => &c.disabled_text,
            "selected_bg" => &c.selected_bg,
            "selected_fg" => &c.selected_fg,
            "overlay_bg" => &c.overlay_bg,
            "error" => &c.error,
            "success" => &c.success,
            _ => return None,
        };
        Some(def)
    }

    /// 전체 토큰 키 목록 ("섹션.키", 정렬됨)
    pub fn token_names(&self) -> Vec<String> {
        let Ok(toml::Value::Table(table)) = toml::Value::try_from(self) else {
            return Vec::new();
        };

        let mut names = Vec::new();
        for (section, value) in &table {
            if let toml::Value::Table(tokens) = value {
                names.extend(tokens.keys().map(|key| format!("{}.{}", section, key)));
            }
        }
        names.sort();
        names
    }

    /// 모든 색상 토큰이 해석 가능한지 검사
    pub fn validate(&self) -> Result<()> {
        let invalid: Vec<String> = self
            .token_names()
            .into_iter()
            .filter_map(|key| {
                let (section, name) = key.split_once('.')?;
                let def = match section {
                    "colors" => self.color_def(name),
                    "custom" => self.custom.get(name),
                    _ => None,
                }?;
                def.try_to_color()
                    .is_none()
                    .then(|| format!("{} = {:?}", key, def.as_str()))
            })
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(UiError::Config(format!(
                "theme '{}' has invalid colors: {}",
                self.name,
                invalid.join(", ")
            )))
        }
    }

    /// TOML 파일에서 테마 로드
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let theme: Theme = toml::from_str(&content)?;
        theme.validate()?;
        Ok(theme)
    }

    /// 테마를 TOML 파일로 저장
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// 테마 레지스트리
///
/// 이름으로 테마를 찾습니다. 기본으로 light/dark를 갖고,
/// 설정 디렉토리의 TOML 테마를 추가로 등록할 수 있습니다.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self {
            themes: vec![light_theme(), dark_theme()],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    /// 이름으로 조회 (없으면 에러)
    pub fn require(&self, name: &str) -> Result<&Theme> {
        self.get(name)
            .ok_or_else(|| UiError::UnknownTheme(name.to_string()))
    }

    /// 사용 가능한 테마 목록 반환
    pub fn names(&self) -> Vec<String> {
        self.themes.iter().map(|t| t.name.clone()).collect()
    }

    /// 테마 추가 (같은 이름이 있으면 교체)
    pub fn add_theme(&mut self, theme: Theme) {
        if let Some(existing) = self.themes.iter_mut().find(|t| t.name == theme.name) {
            *existing = theme;
        } else {
            self.themes.push(theme);
        }
    }

    /// 주어진 테마 다음 테마 (순환)
    pub fn next_after(&self, name: &str) -> &Theme {
        let index = self
            .themes
            .iter()
            .position(|t| t.name == name)
            .map(|i| (i + 1) % self.themes.len())
            .unwrap_or(0);
        &self.themes[index]
    }

    /// 디렉토리의 *.toml 테마 로드
    ///
    /// 파일 이름(확장자 제외)이 테마 이름이 됩니다.
    /// 잘못된 파일은 경고 후 건너뜁니다. 로드한 개수 반환.
    pub fn load_themes_from_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.exists() {
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom")
                .to_string();

            match Theme::from_file(&path) {
                Ok(theme) => {
                    tracing::debug!("loaded theme '{}' from {}", name, path.display());
                    self.add_theme(theme.renamed(name));
                    loaded += 1;
                }
                Err(err) => {
                    tracing::warn!("skipping theme file {}: {}", path.display(), err);
                }
            }
        }

        Ok(loaded)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    #[test]
    fn test_light_and_dark_have_identical_token_keys() {
        let light: BTreeSet<String> = light_theme().token_names().into_iter().collect();
        let dark: BTreeSet<String> = dark_theme().token_names().into_iter().collect();

        assert!(!light.is_empty());
        assert_eq!(light, dark);
        // 모든 키가 조회 가능해야 함
        for key in &light {
            assert!(light_theme().token(key).is_some(), "light missing {}", key);
            assert!(dark_theme().token(key).is_some(), "dark missing {}", key);
        }
    }

    #[test]
    fn test_token_names_cover_every_section() {
        let names = light_theme().token_names();
        assert!(names.contains(&"colors.primary".to_string()));
        assert!(names.contains(&"spacing.overlay_max_height".to_string()));
        assert!(names.contains(&"typography.label".to_string()));
        assert!(names.contains(&"typography.rounded_borders".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("name")));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(light_theme().validate().is_ok());
        assert!(dark_theme().validate().is_ok());
    }

    #[test]
    fn test_token_lookup() {
        let theme = dark_theme();
        assert_eq!(
            theme.token("colors.background"),
            Some(TokenValue::Color(Color::Rgb(30, 30, 30)))
        );
        assert_eq!(theme.token("spacing.gap"), Some(TokenValue::Spacing(1)));
        assert_eq!(
            theme.token("typography.label"),
            Some(TokenValue::Font(FontDef::bold()))
        );
        assert_eq!(theme.token("colors.nope"), None);
        assert_eq!(theme.token("primary"), None);
    }

    #[test]
    fn test_custom_token_extends_without_mutating_preset() {
        let base = light_theme();
        let extended = base.clone().with_custom("brand", "#ff0080");

        assert_eq!(extended.color("custom.brand"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(base.color("custom.brand"), None);
        assert!(extended
            .token_names()
            .contains(&"custom.brand".to_string()));
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(parse_hex_color("#1e1e1e"), Some(Color::Rgb(30, 30, 30)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_named_color_parsing() {
        assert_eq!(ColorDef::from("red").to_color(), Color::Red);
        assert_eq!(ColorDef::from("DarkGrey").to_color(), Color::DarkGray);
        assert_eq!(ColorDef::from("chartreuse").to_color(), Color::Reset);
    }

    #[test]
    fn test_theme_file_round_trip_keeps_named_colors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ocean.toml");
        let mut theme = dark_theme().renamed("ocean");
        theme.colors.error = "LightRed".into();

        theme.save_to_file(&path).unwrap();
        let loaded = Theme::from_file(&path).unwrap();

        assert_eq!(loaded, theme);
        assert_eq!(loaded.colors.error.to_color(), Color::LightRed);
    }

    #[test]
    fn test_invalid_color_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        let mut theme = light_theme();
        theme.colors.primary = "#nothex".into();
        theme.save_to_file(&path).unwrap();

        let err = Theme::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("colors.primary"));
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.names(), vec!["light", "dark"]);
        assert!(registry.require("dark").is_ok());
        assert!(matches!(
            registry.require("solarized"),
            Err(UiError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_registry_cycles() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.next_after("light").name, "dark");
        assert_eq!(registry.next_after("dark").name, "light");
        assert_eq!(registry.next_after("unknown").name, "light");
    }

    #[test]
    fn test_registry_loads_dir_and_skips_broken_files() {
        let temp = TempDir::new().unwrap();
        dark_theme()
            .with_custom("brand", "magenta")
            .save_to_file(&temp.path().join("midnight.toml"))
            .unwrap();
        fs::write(temp.path().join("broken.toml"), "not = [valid").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = ThemeRegistry::new();
        let loaded = registry.load_themes_from_dir(temp.path()).unwrap();

        assert_eq!(loaded, 1);
        let midnight = registry.require("midnight").unwrap();
        assert_eq!(midnight.color("custom.brand"), Some(Color::Magenta));
    }

    #[test]
    fn test_registry_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let mut registry = ThemeRegistry::new();
        assert_eq!(
            registry
                .load_themes_from_dir(&temp.path().join("absent"))
                .unwrap(),
            0
        );
    }
}
