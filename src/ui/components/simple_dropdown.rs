// Simple dropdown component - 단순 드롭다운
//
// 문자열 항목(레이블 == 값), 항상 하나가 선택됨

use super::dropdown_state::{render_overlay, Overlay, OverlayCommand, OverlayRow};
use super::{is_plain, key_press, themed_block, Component, EventOutcome, ValueCallback};
use crate::ui::theme::Theme;
use crate::utils::error::{Result, UiError};
use crossterm::event::{Event, KeyCode};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use std::cell::Cell;

const COMPONENT: &str = "SimpleDropdown";

/// 단순 드롭다운
pub struct SimpleDropdown {
    options: Vec<String>,
    selected: String,
    on_select: ValueCallback,
    focused: bool,
    overlay: Overlay,
    /// 마지막 렌더 시 오버레이 표시 행 수
    overlay_rows: Cell<usize>,
}

impl SimpleDropdown {
    pub fn new(
        options: Vec<String>,
        selected: impl Into<String>,
        on_select: impl FnMut(&str) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            options,
            selected: selected.into(),
            on_select: Box::new(on_select),
            focused: false,
            overlay: Overlay::Closed,
            overlay_rows: Cell::new(Theme::default().spacing.overlay_max_height as usize),
        }
    }

    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
        self.overlay.close();
    }

    pub fn set_selected(&mut self, selected: impl Into<String>) {
        self.selected = selected.into();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.overlay.close();
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// 선택된 항목 인덱스 (prop 검사 포함)
    fn selected_index(&self) -> Result<usize> {
        if self.options.is_empty() {
            return Err(UiError::MissingProp {
                component: COMPONENT,
                prop: "options",
            });
        }
        self.options
            .iter()
            .position(|o| o == &self.selected)
            .ok_or_else(|| UiError::InvalidProp {
                component: COMPONENT,
                prop: "selected",
                reason: format!("'{}' is not one of the options", self.selected),
            })
    }

    /// 항목 선택, 오버레이 닫기
    pub fn select(&mut self, index: usize) -> Result<EventOutcome> {
        self.selected_index()?;
        self.overlay.close();

        let Some(value) = self.options.get(index).cloned() else {
            return Ok(EventOutcome::Ignored);
        };
        tracing::debug!(component = COMPONENT, %value, "option selected");
        (self.on_select)(&value)?;
        Ok(EventOutcome::Consumed)
    }
}

impl Component for SimpleDropdown {
    fn render(&self, theme: &Theme, area: Rect, buf: &mut Buffer) -> Result<()> {
        let selected = self.selected_index()?;
        let header = Rect {
            height: if area.height >= 3 { 3 } else { 1 },
            ..area
        };
        let c = &theme.colors;
        let bg = c.background.to_color();

        let inner = if header.height >= 3 {
            let block = themed_block(theme, self.focused || self.overlay.is_open());
            let inner = block.inner(header);
            block.render(header, buf);
            inner
        } else {
            buf.set_style(header, Style::default().bg(bg));
            header
        };

        let text = format!(
            "{} {}",
            self.selected,
            if self.overlay.is_open() { "▴" } else { "▾" }
        );
        let pad = theme.spacing.padding_x.min(inner.width / 2);
        buf.set_stringn(
            inner.x + pad,
            inner.y,
            &text,
            inner.width.saturating_sub(pad) as usize,
            Style::default().fg(c.text.to_color()).bg(bg),
        );

        let max_visible = theme.spacing.overlay_max_height.max(1) as usize;
        self.overlay_rows.set(max_visible);
        let rows: Vec<OverlayRow<'_>> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| OverlayRow {
                label,
                enabled: true,
                selected: i == selected,
            })
            .collect();
        render_overlay(theme, header, &rows, &self.overlay, max_visible, buf);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<EventOutcome> {
        let Some(key) = key_press(event) else {
            return Ok(EventOutcome::Ignored);
        };
        let selected = self.selected_index()?;

        // 닫힌 상태에서 좌/우로 바로 이전/다음 항목 선택
        if !self.overlay.is_open() && is_plain(key) {
            let len = self.options.len();
            match key.code {
                KeyCode::Left if selected > 0 => return self.select(selected - 1),
                KeyCode::Right if selected + 1 < len => return self.select(selected + 1),
                KeyCode::Left | KeyCode::Right => return Ok(EventOutcome::Consumed),
                _ => {}
            }
        }

        let enabled = vec![true; self.options.len()];
        let visible = self.overlay_rows.get();
        match self
            .overlay
            .handle_key(key, &enabled, Some(selected), visible)
        {
            OverlayCommand::Select(index) => self.select(index),
            OverlayCommand::Changed => Ok(EventOutcome::Consumed),
            OverlayCommand::Ignored => Ok(EventOutcome::Ignored),
        }
    }

    fn unmount(&mut self) {
        self.overlay.close();
    }
}
