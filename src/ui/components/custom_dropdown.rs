// Custom dropdown component - 커스텀 드롭다운
//
// 레이블/값 분리, 비활성 항목, 미선택 상태(placeholder), 스크롤되는 오버레이

use super::dropdown_state::{render_overlay, Overlay, OverlayCommand, OverlayRow};
use super::{key_press, themed_block, Component, EventOutcome, ValueCallback};
use crate::ui::theme::Theme;
use crate::utils::error::{Result, UiError};
use crossterm::event::Event;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use std::cell::Cell;
use unicode_width::UnicodeWidthStr;

const COMPONENT: &str = "CustomDropdown";

/// 드롭다운 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    /// 표시 레이블
    pub label: String,
    /// on_select로 전달되는 값
    pub value: String,
    /// 활성화 여부
    pub enabled: bool,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// 레이블과 값이 같은 항목
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// 활성화 여부 설정
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// 커스텀 드롭다운
pub struct CustomDropdown {
    label: Option<String>,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    placeholder: String,
    on_select: ValueCallback,
    focused: bool,
    overlay: Overlay,
    /// 마지막 렌더 시 오버레이 높이 (스크롤 계산용)
    overlay_rows: Cell<usize>,
}

impl CustomDropdown {
    pub fn new(
        options: Vec<DropdownOption>,
        on_select: impl FnMut(&str) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            label: None,
            options,
            selected: None,
            placeholder: "Select...".to_string(),
            on_select: Box::new(on_select),
            focused: false,
            overlay: Overlay::Closed,
            overlay_rows: Cell::new(Theme::default().spacing.overlay_max_height as usize),
        }
    }

    /// 테두리 제목
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 선택된 값 (None이면 미선택)
    pub fn selected(mut self, value: Option<impl Into<String>>) -> Self {
        self.selected = value.map(Into::into);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        self.options = options;
        // 항목이 바뀌면 강조 위치가 무의미해짐
        self.overlay.close();
    }

    pub fn set_selected(&mut self, value: Option<impl Into<String>>) {
        self.selected = value.map(Into::into);
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.overlay.close();
        }
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// 필수 prop 검사, 선택된 항목 인덱스 반환
    fn validate(&self) -> Result<Option<usize>> {
        if self.options.is_empty() {
            return Err(UiError::MissingProp {
                component: COMPONENT,
                prop: "options",
            });
        }
        match &self.selected {
            None => Ok(None),
            Some(value) => self
                .options
                .iter()
                .position(|o| &o.value == value)
                .map(Some)
                .ok_or_else(|| UiError::InvalidProp {
                    component: COMPONENT,
                    prop: "selected",
                    reason: format!("'{}' is not one of the options", value),
                }),
        }
    }

    fn enabled_flags(&self) -> Vec<bool> {
        self.options.iter().map(|o| o.enabled).collect()
    }

    /// 항목 선택 (비활성 항목은 무시). 오버레이는 닫힙니다.
    pub fn select(&mut self, index: usize) -> Result<EventOutcome> {
        self.validate()?;
        self.overlay.close();

        let Some(option) = self.options.get(index) else {
            return Ok(EventOutcome::Ignored);
        };
        if !option.enabled {
            return Ok(EventOutcome::Ignored);
        }

        let value = option.value.clone();
        tracing::debug!(component = COMPONENT, %value, "option selected");
        (self.on_select)(&value)?;
        Ok(EventOutcome::Consumed)
    }

    /// 헤더 영역 (테두리 포함 3줄 또는 1줄)
    fn header_area(area: Rect) -> Rect {
        let height = if area.height >= 3 { 3 } else { 1 };
        Rect { height, ..area }
    }
}

impl Component for CustomDropdown {
    fn render(&self, theme: &Theme, area: Rect, buf: &mut Buffer) -> Result<()> {
        let selected = self.validate()?;
        let header = Self::header_area(area);
        let c = &theme.colors;
        let bg = c.background.to_color();

        let inner = if header.height >= 3 {
            let mut block = themed_block(theme, self.focused || self.overlay.is_open());
            if let Some(label) = &self.label {
                block = block.title(Span::styled(
                    format!(" {} ", label),
                    Style::default()
                        .fg(c.text_secondary.to_color())
                        .add_modifier(theme.typography.title.to_modifier()),
                ));
            }
            let inner = block.inner(header);
            block.render(header, buf);
            inner
        } else {
            buf.set_style(header, Style::default().bg(bg));
            header
        };
        if inner.width < 3 {
            return Ok(());
        }

        let (text, style) = match selected {
            Some(index) => (
                self.options[index].label.as_str(),
                Style::default().fg(c.text.to_color()).bg(bg),
            ),
            None => (
                self.placeholder.as_str(),
                Style::default()
                    .fg(c.placeholder.to_color())
                    .bg(bg)
                    .add_modifier(theme.typography.placeholder.to_modifier()),
            ),
        };

        let arrow = if self.overlay.is_open() { "▲" } else { "▼" };
        let pad = theme.spacing.padding_x.min(1);
        let text_width = inner.width.saturating_sub(pad * 2 + 2);
        let shown = truncate_to_width(text, text_width as usize);
        let line = Line::from(vec![Span::styled(shown, style)]);
        buf.set_line(inner.x + pad, inner.y, &line, text_width);
        buf.set_string(
            inner.x + inner.width - pad - 1,
            inner.y,
            arrow,
            Style::default().fg(c.text_secondary.to_color()).bg(bg),
        );

        let max_visible = theme.spacing.overlay_max_height.max(1) as usize;
        self.overlay_rows.set(max_visible);
        let rows: Vec<OverlayRow<'_>> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, o)| OverlayRow {
                label: &o.label,
                enabled: o.enabled,
                selected: selected == Some(i),
            })
            .collect();
        render_overlay(
            theme,
            header,
            &rows,
            &self.overlay,
            max_visible,
            buf,
        );
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<EventOutcome> {
        let Some(key) = key_press(event) else {
            return Ok(EventOutcome::Ignored);
        };
        let selected = self.validate()?;
        let enabled = self.enabled_flags();
        let visible = self.overlay_rows.get();

        match self.overlay.handle_key(key, &enabled, selected, visible) {
            OverlayCommand::Select(index) => self.select(index),
            OverlayCommand::Changed => Ok(EventOutcome::Consumed),
            OverlayCommand::Ignored => Ok(EventOutcome::Ignored),
        }
    }

    fn unmount(&mut self) {
        self.overlay.close();
    }
}

/// 표시 폭에 맞게 자르기 (넘치면 …)
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
