// Custom button component - 버튼 컴포넌트
//
// Enter/Space 누름 또는 마우스 왼쪽 클릭 한 번에 on_press 한 번

use super::{is_plain, key_press, themed_block, Callback, Component, EventOutcome};
use crate::ui::theme::{ColorDef, Theme};
use crate::utils::error::{Result, UiError};
use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    widgets::Widget,
};
use std::cell::Cell;
use unicode_width::UnicodeWidthStr;

const COMPONENT: &str = "CustomButton";

/// 테마 토큰 덮어쓰기
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonOverrides {
    pub background: Option<ColorDef>,
    pub text: Option<ColorDef>,
    pub border: Option<ColorDef>,
}

/// 버튼
pub struct CustomButton {
    label: String,
    on_press: Callback,
    disabled: bool,
    focused: bool,
    overrides: ButtonOverrides,
    /// 마지막 렌더 영역 (마우스 히트 테스트용)
    last_area: Cell<Option<Rect>>,
}

impl CustomButton {
    pub fn new(
        label: impl Into<String>,
        on_press: impl FnMut() -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            on_press: Box::new(on_press),
            disabled: false,
            focused: false,
            overrides: ButtonOverrides::default(),
            last_area: Cell::new(None),
        }
    }

    /// 비활성 여부 설정
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn overrides(mut self, overrides: ButtonOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// 버튼 활성화 (비활성 상태면 무시)
    ///
    /// on_press가 호출되었으면 `Consumed`.
    pub fn press(&mut self) -> Result<EventOutcome> {
        self.validate()?;
        if self.disabled {
            tracing::trace!(label = %self.label, "press ignored: disabled");
            return Ok(EventOutcome::Ignored);
        }
        (self.on_press)()?;
        Ok(EventOutcome::Consumed)
    }

    fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(UiError::MissingProp {
                component: COMPONENT,
                prop: "label",
            });
        }
        Ok(())
    }

    /// (배경, 전경, 테두리) 색상
    fn colors(&self, theme: &Theme) -> (Color, Color, Color) {
        let c = &theme.colors;
        if self.disabled {
            return (
                c.disabled.to_color(),
                c.disabled_text.to_color(),
                c.border.to_color(),
            );
        }

        let pick = |over: &Option<ColorDef>, token: &ColorDef| {
            over.as_ref().unwrap_or(token).to_color()
        };
        let border_token = if self.focused {
            &c.border_focused
        } else {
            &c.border
        };
        (
            pick(&self.overrides.background, &c.primary),
            pick(&self.overrides.text, &c.on_primary),
            pick(&self.overrides.border, border_token),
        )
    }

    fn hit(&self, column: u16, row: u16) -> bool {
        self.last_area
            .get()
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

impl Component for CustomButton {
    fn render(&self, theme: &Theme, area: Rect, buf: &mut Buffer) -> Result<()> {
        self.validate()?;
        self.last_area.set(Some(area));

        let (bg, fg, border) = self.colors(theme);
        buf.set_style(area, Style::default().bg(bg));

        // 높이 3 이상이면 테두리
        let inner = if area.height >= 3 {
            let block = themed_block(theme, self.focused)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(bg));
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.width == 0 || inner.height == 0 {
            return Ok(());
        }

        let label_width = (self.label.width() as u16).min(inner.width);
        let x = inner.x + (inner.width - label_width) / 2;
        let y = inner.y + inner.height.saturating_sub(1) / 2;
        let style = Style::default()
            .fg(fg)
            .bg(bg)
            .add_modifier(theme.typography.label.to_modifier());
        buf.set_stringn(x, y, &self.label, label_width as usize, style);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<EventOutcome> {
        if let Some(key) = key_press(event) {
            return match key.code {
                KeyCode::Enter | KeyCode::Char(' ') if is_plain(key) => self.press(),
                _ => Ok(EventOutcome::Ignored),
            };
        }

        if let Event::Mouse(mouse) = event {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                && self.hit(mouse.column, mouse.row)
            {
                return self.press();
            }
        }

        Ok(EventOutcome::Ignored)
    }

    fn unmount(&mut self) {
        self.last_area.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::*;
    use crate::ui::theme::{dark_theme, light_theme};
    use crossterm::event::{KeyEventKind, KeyModifiers, MouseEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counting_button(label: &str) -> (CustomButton, Rc<RefCell<usize>>) {
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let button = CustomButton::new(label, move || {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        (button, count)
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_enter_press_calls_once() {
        let (mut button, count) = counting_button("OK");
        let outcome = button.handle_event(&press(KeyCode::Enter)).unwrap();
        assert_eq!(outcome, EventOutcome::Consumed);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_repeat_and_release_are_not_gestures() {
        let (mut button, count) = counting_button("OK");
        button
            .handle_event(&key_with_kind(KeyCode::Enter, KeyEventKind::Press))
            .unwrap();
        button
            .handle_event(&key_with_kind(KeyCode::Enter, KeyEventKind::Repeat))
            .unwrap();
        button
            .handle_event(&key_with_kind(KeyCode::Enter, KeyEventKind::Release))
            .unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_disabled_never_calls_on_press() {
        let (button, count) = counting_button("Delete");
        let mut button = button.disabled(true);

        button.handle_event(&press(KeyCode::Enter)).unwrap();
        button.handle_event(&type_char(' ')).unwrap();
        assert_eq!(button.press().unwrap(), EventOutcome::Ignored);

        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        button.render(&light_theme(), area, &mut buf).unwrap();
        button.handle_event(&click(2, 1)).unwrap();

        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_mouse_click_inside_rendered_area() {
        let (mut button, count) = counting_button("Go");
        let area = Rect::new(5, 2, 8, 3);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 6));

        // 렌더 전에는 히트 영역 없음
        button.handle_event(&click(6, 3)).unwrap();
        assert_eq!(*count.borrow(), 0);

        button.render(&dark_theme(), area, &mut buf).unwrap();
        button.handle_event(&click(0, 0)).unwrap();
        assert_eq!(*count.borrow(), 0);
        button.handle_event(&click(6, 3)).unwrap();
        assert_eq!(*count.borrow(), 1);

        button.unmount();
        button.handle_event(&click(6, 3)).unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_modified_enter_ignored() {
        let (mut button, count) = counting_button("OK");
        let outcome = button
            .handle_event(&press_with(KeyCode::Enter, KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut button = CustomButton::new("Save", || anyhow::bail!("disk full"));
        let err = button.handle_event(&press(KeyCode::Enter)).unwrap_err();
        assert!(matches!(err, UiError::Callback(_)));
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_empty_label_is_config_error() {
        let (button, _) = counting_button("  ");
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        assert!(matches!(
            button.render(&light_theme(), area, &mut buf),
            Err(UiError::MissingProp { prop: "label", .. })
        ));
    }

    #[test]
    fn test_empty_label_blocks_activation() {
        let (mut button, count) = counting_button("");
        assert!(matches!(
            button.handle_event(&press(KeyCode::Enter)),
            Err(UiError::MissingProp { prop: "label", .. })
        ));
        assert!(button.press().is_err());
        assert_eq!(*count.borrow(), 0);

        button.set_label("OK");
        button.press().unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_render_uses_theme_colors() {
        let (button, _) = counting_button("OK");
        let area = Rect::new(0, 0, 10, 3);
        let theme = dark_theme();
        let mut buf = Buffer::empty(area);
        button.render(&theme, area, &mut buf).unwrap();

        assert!(row_text(&buf, area, 1).contains("OK"));
        let cell = buf.cell((4, 1)).unwrap();
        assert_eq!(cell.bg, theme.colors.primary.to_color());
        assert_eq!(cell.fg, theme.colors.on_primary.to_color());
    }

    #[test]
    fn test_overrides_win_over_theme() {
        let (button, _) = counting_button("OK");
        let button = button.overrides(ButtonOverrides {
            background: Some("#ff0000".into()),
            ..Default::default()
        });
        let area = Rect::new(0, 0, 6, 1);
        let mut buf = Buffer::empty(area);
        let theme = light_theme();
        button.render(&theme, area, &mut buf).unwrap();

        let cell = buf.cell((2, 0)).unwrap();
        assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.fg, theme.colors.on_primary.to_color());
    }
}
