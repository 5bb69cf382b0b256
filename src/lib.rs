//! 복슬 UI - ratatui용 테마 컴포넌트 모음
//!
//! 호스트 앱은 [`ThemeProvider`]로 테마 스코프를 만들고, 컴포넌트는 렌더 시점에
//! [`use_app_theme`]로 활성 테마의 토큰을 읽습니다. 컴포넌트는 props를 받고
//! 콜백으로 이벤트를 돌려줍니다.

pub mod ui;
pub mod utils;

pub use utils::time::get_current_time;

pub use ui::theme::{dark_theme, light_theme};

pub use ui::components::{CustomButton, CustomDropdown, CustomSearchBar, SimpleDropdown, TextInput};

pub use ui::theme_provider::{use_app_theme, ThemeProvider};

// 보조 타입
pub use ui::components::{
    render_with_provider, ButtonOverrides, Component, DropdownOption, EventOutcome,
};
pub use ui::theme::{ColorDef, FontDef, Theme, ThemeRegistry, TokenValue};
pub use utils::config::UiConfig;
pub use utils::error::{Result, UiError};
pub use utils::time::{Clock, SystemClock};
