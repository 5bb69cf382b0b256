// UI Components
//
// 모든 컴포넌트는 props를 받고 콜백으로 이벤트를 내보냅니다.
// 렌더 시점에 활성 테마에서 스타일 토큰을 해석합니다.

pub mod custom_button;
pub mod custom_dropdown;
pub mod custom_search_bar;
pub mod dropdown_state;
pub mod simple_dropdown;
pub mod text_edit;
pub mod text_input;

use super::theme::Theme;
use super::theme_provider::ThemeProvider;
use crate::utils::error::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, BorderType, Borders},
};

// Re-export components for convenience
pub use custom_button::{ButtonOverrides, CustomButton};
pub use custom_dropdown::{CustomDropdown, DropdownOption};
pub use custom_search_bar::CustomSearchBar;
pub use simple_dropdown::SimpleDropdown;
pub use text_input::TextInput;

/// 호스트 콜백 (에러는 호스트로 그대로 전달)
pub type Callback = Box<dyn FnMut() -> anyhow::Result<()>>;
/// 값을 받는 호스트 콜백
pub type ValueCallback = Box<dyn FnMut(&str) -> anyhow::Result<()>>;

/// 이벤트 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// 컴포넌트가 이벤트를 소비함
    Consumed,
    /// 컴포넌트와 무관한 이벤트 (호스트가 처리)
    Ignored,
}

impl EventOutcome {
    pub fn is_consumed(self) -> bool {
        self == EventOutcome::Consumed
    }
}

/// 컴포넌트 공통 인터페이스
pub trait Component {
    /// 주어진 테마로 그리기
    ///
    /// 필수 prop이 없거나 잘못되었으면 에러를 반환합니다.
    fn render(&self, theme: &Theme, area: Rect, buf: &mut Buffer) -> Result<()>;

    /// 입력 이벤트 처리 (포커스된 컴포넌트에만 전달)
    fn handle_event(&mut self, event: &Event) -> Result<EventOutcome>;

    /// 화면에서 제거될 때 로컬 상태 정리
    fn unmount(&mut self) {}
}

/// 프로바이더의 활성 테마로 렌더링
pub fn render_with_provider(
    component: &dyn Component,
    provider: &ThemeProvider,
    area: Rect,
    buf: &mut Buffer,
) -> Result<()> {
    let theme = provider.use_app_theme();
    component.render(&theme, area, buf)
}

/// 키 "누름" 이벤트만 추출 (반복/떼기 제외)
pub(crate) fn key_press(event: &Event) -> Option<&KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

/// 수식키 없는(또는 Shift만) 키인지
pub(crate) fn is_plain(key: &KeyEvent) -> bool {
    key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

/// Ctrl+문자 조합인지
pub(crate) fn is_ctrl_char(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// 테마 기반 테두리 블록
pub(crate) fn themed_block<'a>(theme: &Theme, focused: bool) -> Block<'a> {
    let border_color = if focused {
        theme.colors.border_focused.to_color()
    } else {
        theme.colors.border.to_color()
    };
    let border_type = if theme.typography.rounded_borders {
        BorderType::Rounded
    } else {
        BorderType::Plain
    };

    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.colors.background.to_color()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crossterm::event::{
        Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers,
    };
    use ratatui::{buffer::Buffer, layout::Rect};

    pub fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn press_with(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    pub fn key_with_kind(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    pub fn type_char(c: char) -> Event {
        press(KeyCode::Char(c))
    }

    /// 버퍼 한 줄을 문자열로
    pub fn row_text(buf: &Buffer, area: Rect, y: u16) -> String {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        line
    }

    /// 버퍼 전체를 문자열로
    pub fn buffer_text(buf: &Buffer, area: Rect) -> String {
        let mut rendered = String::new();
        for y in area.y..area.y + area.height {
            rendered.push_str(&row_text(buf, area, y));
            rendered.push('\n');
        }
        rendered
    }
}
