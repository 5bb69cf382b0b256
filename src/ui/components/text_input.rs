// Text input component - 제어형 입력 필드
//
// 표시 값은 항상 호스트가 준 value입니다. 편집은 on_change_text로만 알립니다.

use super::text_edit::{clamp_cursor, EditAction, EditBuffer};
use super::{key_press, themed_block, Component, EventOutcome, ValueCallback};
use crate::ui::theme::Theme;
use crate::utils::error::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};
use unicode_width::UnicodeWidthChar;

const MASK_CHAR: char = '•';

type Formatter = Box<dyn Fn(&str) -> String>;
type Validator = Box<dyn Fn(&str) -> std::result::Result<(), String>>;

/// 입력 처리 결과 (검색바 등 래퍼용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputEvent {
    /// on_change_text가 호출됨
    Changed(String),
    /// on_submit_editing이 호출됨
    Submitted,
    /// 커서만 이동 (또는 길이 제한으로 거부된 편집)
    Moved,
    Ignored,
}

/// 제어형 텍스트 입력
pub struct TextInput {
    value: String,
    placeholder: String,
    on_change_text: ValueCallback,
    on_submit_editing: Option<ValueCallback>,
    formatter: Option<Formatter>,
    validator: Option<Validator>,
    secure_text_entry: bool,
    max_length: Option<usize>,
    focused: bool,
    /// 편집 세션 커서 (바이트 인덱스)
    cursor: usize,
}

impl TextInput {
    pub fn new(
        value: impl Into<String>,
        on_change_text: impl FnMut(&str) -> anyhow::Result<()> + 'static,
    ) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self {
            value,
            placeholder: String::new(),
            on_change_text: Box::new(on_change_text),
            on_submit_editing: None,
            formatter: None,
            validator: None,
            secure_text_entry: false,
            max_length: None,
            focused: false,
            cursor,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Enter 시 호출
    pub fn on_submit_editing(
        mut self,
        callback: impl FnMut(&str) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.on_submit_editing = Some(Box::new(callback));
        self
    }

    /// 편집 결과를 on_change_text 전에 변환
    pub fn formatter(mut self, formatter: impl Fn(&str) -> String + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// 현재 값 검증 (에러 메시지는 입력 아래에 표시)
    pub fn validator(
        mut self,
        validator: impl Fn(&str) -> std::result::Result<(), String> + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// 비밀번호 입력 (마스킹)
    pub fn secure_text_entry(mut self, secure: bool) -> Self {
        self.secure_text_entry = secure;
        self
    }

    /// 최대 글자 수 (초과하는 편집은 무시)
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// 호스트가 값 갱신
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = clamp_cursor(&self.value, self.cursor);
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// 화면에 쓰이는 커서 위치 (값 범위로 보정됨)
    pub fn cursor(&self) -> usize {
        clamp_cursor(&self.value, self.cursor)
    }

    /// 현재 값의 검증 에러
    pub fn validation_error(&self) -> Option<String> {
        self.validator
            .as_ref()
            .and_then(|validate| validate(&self.value).err())
    }

    /// 호스트에 새 값 알림 (표시 값은 바꾸지 않음)
    pub(crate) fn emit_change(&mut self, text: &str) -> Result<()> {
        (self.on_change_text)(text)?;
        Ok(())
    }

    /// 입력 처리 후 무엇이 일어났는지 반환
    pub(crate) fn process(&mut self, event: &Event) -> Result<InputEvent> {
        let Some(key) = key_press(event) else {
            return Ok(InputEvent::Ignored);
        };

        if key.code == KeyCode::Enter && key.modifiers.is_empty() {
            return match self.on_submit_editing.as_mut() {
                Some(submit) => {
                    submit(&self.value)?;
                    Ok(InputEvent::Submitted)
                }
                None => Ok(InputEvent::Ignored),
            };
        }

        let Some(action) = EditAction::from_key(key) else {
            return Ok(InputEvent::Ignored);
        };

        let mut buffer = EditBuffer::new(&self.value, self.cursor);
        buffer.apply(action);

        if !action.is_edit() || buffer.value == self.value {
            self.cursor = buffer.cursor;
            return Ok(InputEvent::Moved);
        }

        let mut next = buffer.value;
        if let Some(format) = &self.formatter {
            next = format(&next);
        }
        // 길이 제한은 글자가 늘어나는 편집에만 적용 (삭제는 항상 허용)
        let next_len = next.chars().count();
        if self
            .max_length
            .is_some_and(|max| next_len > max && next_len > self.value.chars().count())
        {
            tracing::trace!("edit rejected: max_length");
            return Ok(InputEvent::Moved);
        }

        self.cursor = clamp_cursor(&next, buffer.cursor);
        self.emit_change(&next)?;
        Ok(InputEvent::Changed(next))
    }

    /// 표시 문자열 (마스킹 적용)
    fn display_text(&self) -> String {
        if self.secure_text_entry {
            self.value.chars().map(|_| MASK_CHAR).collect()
        } else {
            self.value.clone()
        }
    }

    /// 커서가 보이도록 앞부분을 잘라낸 (표시 문자열, 커서 열)
    fn visible_window(&self, width: u16) -> (String, u16) {
        let display = self.display_text();
        let cursor_chars = self.value[..self.cursor()].chars().count();
        let chars: Vec<char> = display.chars().collect();
        let width = width.max(1) as usize;

        let prefix_width = |from: usize| -> usize {
            chars[from..cursor_chars]
                .iter()
                .filter_map(|c| c.width())
                .sum()
        };
        let mut start = 0;
        while start < cursor_chars && prefix_width(start) >= width {
            start += 1;
        }

        let visible: String = chars[start..].iter().collect();
        (visible, prefix_width(start) as u16)
    }

    /// 입력 한 줄 렌더링
    pub(crate) fn render_line(&self, theme: &Theme, area: Rect, buf: &mut Buffer) {
        let c = &theme.colors;
        let bg = c.background.to_color();
        buf.set_style(area, Style::default().bg(bg));

        if self.value.is_empty() {
            let style = Style::default()
                .fg(c.placeholder.to_color())
                .bg(bg)
                .add_modifier(theme.typography.placeholder.to_modifier());
            buf.set_stringn(area.x, area.y, &self.placeholder, area.width as usize, style);
            if self.focused {
                if let Some(cell) = buf.cell_mut((area.x, area.y)) {
                    cell.modifier.insert(Modifier::REVERSED);
                }
            }
            return;
        }

        let (visible, cursor_col) = self.visible_window(area.width);
        let fg = if self.validation_error().is_some() {
            c.error.to_color()
        } else {
            c.text.to_color()
        };
        buf.set_stringn(
            area.x,
            area.y,
            &visible,
            area.width as usize,
            Style::default().fg(fg).bg(bg),
        );

        if self.focused && cursor_col < area.width {
            if let Some(cell) = buf.cell_mut((area.x + cursor_col, area.y)) {
                cell.modifier.insert(Modifier::REVERSED);
            }
        }
    }
}

impl Component for TextInput {
    fn render(&self, theme: &Theme, area: Rect, buf: &mut Buffer) -> Result<()> {
        if area.height < 3 {
            self.render_line(theme, area, buf);
            return Ok(());
        }

        let mut block = themed_block(theme, self.focused);
        if let Some(message) = self.validation_error() {
            block = block.title_bottom(
                Line::styled(message, Style::default().fg(theme.colors.error.to_color()))
                    .left_aligned(),
            );
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let padding = theme.spacing.padding_x.min(inner.width / 2);
        let line_area = Rect {
            x: inner.x + padding,
            y: inner.y,
            width: inner.width.saturating_sub(padding * 2),
            height: 1.min(inner.height),
        };
        if line_area.width > 0 && line_area.height > 0 {
            self.render_line(theme, line_area, buf);
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<EventOutcome> {
        Ok(match self.process(event)? {
            InputEvent::Ignored => EventOutcome::Ignored,
            _ => EventOutcome::Consumed,
        })
    }

    fn unmount(&mut self) {
        self.cursor = self.value.len();
    }
}
