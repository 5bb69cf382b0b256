use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Theme parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Theme serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// 필수 prop 누락 (예: 옵션 없는 드롭다운)
    #[error("{component}: missing required prop `{prop}`")]
    MissingProp {
        component: &'static str,
        prop: &'static str,
    },

    #[error("{component}: invalid prop `{prop}`: {reason}")]
    InvalidProp {
        component: &'static str,
        prop: &'static str,
        reason: String,
    },

    #[error("no enclosing ThemeProvider scope")]
    NoThemeProvider,

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// 호스트 콜백이 반환한 에러 (그대로 전달)
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, UiError>;
