// UI configuration - 설정 파일 로드
//
// <config_dir>/boksl-ui/config.toml

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 설정 디렉토리 이름
pub const CONFIG_DIR_NAME: &str = "boksl-ui";

/// 검색바 디바운스 기본값 (ms)
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// 라이브러리/데모 공통 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// 시작 테마 이름 ("light", "dark" 또는 커스텀 테마 파일 이름)
    pub default_theme: String,
    /// 검색바 디바운스 (ms)
    pub search_debounce_ms: u64,
    /// 커스텀 테마 디렉토리 (없으면 <config_dir>/boksl-ui/themes)
    pub theme_dir: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_theme: "light".to_string(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            theme_dir: None,
        }
    }
}

impl UiConfig {
    /// 기본 설정 파일 경로
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// 기본 위치에서 로드 (파일이 없으면 기본값)
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// 지정 경로에서 로드 (파일이 없으면 기본값)
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("config file not found, using defaults: {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: UiConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// 커스텀 테마 디렉토리
    pub fn theme_dir(&self) -> Option<PathBuf> {
        self.theme_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("themes")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = UiConfig::load_from(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config, UiConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_theme = \"dark\"\n").unwrap();

        let config = UiConfig::load_from(&path).unwrap();
        assert_eq!(config.default_theme, "dark");
        assert_eq!(config.search_debounce_ms, DEFAULT_SEARCH_DEBOUNCE_MS);
        assert_eq!(config.theme_dir, None);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = UiConfig {
            default_theme: "dark".into(),
            search_debounce_ms: 120,
            theme_dir: Some(temp.path().join("themes")),
        };

        config.save_to(&path).unwrap();
        assert_eq!(UiConfig::load_from(&path).unwrap(), config);
        assert_eq!(config.search_debounce(), Duration::from_millis(120));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "search_debounce_ms = \"soon\"").unwrap();
        assert!(UiConfig::load_from(&path).is_err());
    }
}
