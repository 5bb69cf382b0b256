// Dropdown overlay state - 드롭다운 공통 상태/렌더링
//
// 오버레이 열림/닫힘은 각 인스턴스가 소유하는 로컬 상태입니다.

use super::{is_plain, themed_block};
use crate::ui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Clear, Widget},
};

/// 오버레이 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Overlay {
    #[default]
    Closed,
    Open {
        /// 강조된 항목 (선택 가능한 항목이 없으면 None)
        highlighted: Option<usize>,
        /// 첫 번째로 보이는 항목
        scroll: usize,
    },
}

/// 키 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OverlayCommand {
    /// 항목 선택 (오버레이는 이미 닫힘)
    Select(usize),
    /// 상태만 변경
    Changed,
    Ignored,
}

impl Overlay {
    pub(crate) fn is_open(&self) -> bool {
        matches!(self, Overlay::Open { .. })
    }

    pub(crate) fn highlighted(&self) -> Option<usize> {
        match self {
            Overlay::Open { highlighted, .. } => *highlighted,
            Overlay::Closed => None,
        }
    }

    pub(crate) fn scroll(&self) -> usize {
        match self {
            Overlay::Open { scroll, .. } => *scroll,
            Overlay::Closed => 0,
        }
    }

    /// 열기: 선택된 항목(없으면 첫 활성 항목)을 강조
    pub(crate) fn open(selected: Option<usize>, enabled: &[bool], visible: usize) -> Self {
        let highlighted = selected
            .filter(|&i| enabled.get(i).copied().unwrap_or(false))
            .or_else(|| enabled.iter().position(|&e| e));
        let mut overlay = Overlay::Open {
            highlighted,
            scroll: 0,
        };
        overlay.keep_visible(visible);
        overlay
    }

    pub(crate) fn close(&mut self) {
        *self = Overlay::Closed;
    }

    /// 다음 활성 항목으로 (비활성 항목 건너뛰기, 순환)
    pub(crate) fn move_next(&mut self, enabled: &[bool], visible: usize) {
        self.step(enabled, visible, true);
    }

    /// 이전 활성 항목으로
    pub(crate) fn move_prev(&mut self, enabled: &[bool], visible: usize) {
        self.step(enabled, visible, false);
    }

    fn step(&mut self, enabled: &[bool], visible: usize, forward: bool) {
        let Overlay::Open { highlighted, .. } = self else {
            return;
        };
        let len = enabled.len();
        if len == 0 {
            return;
        }

        let start = highlighted.unwrap_or(if forward { len - 1 } else { 0 });
        let mut index = start;
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if enabled[index] {
                *highlighted = Some(index);
                break;
            }
        }
        self.keep_visible(visible);
    }

    fn jump(&mut self, enabled: &[bool], visible: usize, first: bool) {
        let target = if first {
            enabled.iter().position(|&e| e)
        } else {
            enabled.iter().rposition(|&e| e)
        };
        if let Overlay::Open { highlighted, .. } = self {
            *highlighted = target;
        }
        self.keep_visible(visible);
    }

    /// 강조 항목이 보이도록 스크롤 조정
    fn keep_visible(&mut self, visible: usize) {
        if let Overlay::Open {
            highlighted: Some(h),
            scroll,
        } = self
        {
            let visible = visible.max(1);
            if *h < *scroll {
                *scroll = *h;
            } else if *h >= *scroll + visible {
                *scroll = *h + 1 - visible;
            }
        }
    }

    /// 공통 키 처리
    ///
    /// 닫힘: Enter/Space/Alt+Down으로 열기
    /// 열림: Up/Down/Home/End 이동, Enter/Space 선택, Esc 닫기, Tab 닫고 포커스 이동은 호스트에
    pub(crate) fn handle_key(
        &mut self,
        key: &KeyEvent,
        enabled: &[bool],
        selected: Option<usize>,
        visible: usize,
    ) -> OverlayCommand {
        let alt_down =
            key.code == KeyCode::Down && key.modifiers.contains(KeyModifiers::ALT);

        if !self.is_open() {
            let opens = alt_down
                || (is_plain(key)
                    && matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down));
            if opens {
                *self = Overlay::open(selected, enabled, visible);
                return OverlayCommand::Changed;
            }
            return OverlayCommand::Ignored;
        }

        if !is_plain(key) {
            return OverlayCommand::Ignored;
        }
        match key.code {
            KeyCode::Down => self.move_next(enabled, visible),
            KeyCode::Up => self.move_prev(enabled, visible),
            KeyCode::Home => self.jump(enabled, visible, true),
            KeyCode::End => self.jump(enabled, visible, false),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let highlighted = self.highlighted();
                self.close();
                return match highlighted {
                    Some(index) => OverlayCommand::Select(index),
                    None => OverlayCommand::Changed,
                };
            }
            KeyCode::Esc => self.close(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.close();
                return OverlayCommand::Ignored;
            }
            _ => return OverlayCommand::Ignored,
        }
        OverlayCommand::Changed
    }
}

/// 오버레이 항목 한 줄
pub(crate) struct OverlayRow<'a> {
    pub label: &'a str,
    pub enabled: bool,
    pub selected: bool,
}

/// 오버레이 렌더링 (헤더 바로 아래, 버퍼 범위로 잘림)
///
/// 다른 위젯 위에 그려지도록 먼저 영역을 지웁니다.
pub(crate) fn render_overlay(
    theme: &Theme,
    header: Rect,
    rows: &[OverlayRow<'_>],
    overlay: &Overlay,
    max_visible: usize,
    buf: &mut Buffer,
) {
    if !overlay.is_open() || rows.is_empty() {
        return;
    }

    let visible = rows.len().min(max_visible.max(1));
    let wanted = Rect {
        x: header.x,
        y: header.y + header.height,
        width: header.width,
        height: visible as u16 + 2,
    };
    let area = wanted.intersection(*buf.area());
    if area.height < 3 || area.width < 3 {
        return;
    }

    let c = &theme.colors;
    let bg = c.overlay_bg.to_color();
    Clear.render(area, buf);
    let block = themed_block(theme, true).style(Style::default().bg(bg));
    let inner = block.inner(area);
    block.render(area, buf);

    // 테마가 바뀌어 높이가 달라졌을 수 있으므로 강조 항목 기준으로 다시 보정
    let rows_visible = (inner.height as usize).max(1);
    let highlighted = overlay.highlighted();
    let mut scroll = overlay.scroll().min(rows.len().saturating_sub(rows_visible));
    if let Some(h) = highlighted {
        if h < scroll {
            scroll = h;
        } else if h >= scroll + rows_visible {
            scroll = h + 1 - rows_visible;
        }
    }
    for (row, (index, item)) in rows
        .iter()
        .enumerate()
        .skip(scroll)
        .take(inner.height as usize)
        .enumerate()
    {
        let y = inner.y + row as u16;
        let (fg, row_bg): (Color, Color) = if !item.enabled {
            (c.disabled_text.to_color(), bg)
        } else if highlighted == Some(index) {
            (c.selected_fg.to_color(), c.selected_bg.to_color())
        } else {
            (c.text.to_color(), bg)
        };

        let line_area = Rect::new(inner.x, y, inner.width, 1);
        buf.set_style(line_area, Style::default().bg(row_bg));

        let marker = if item.selected { "✓ " } else { "  " };
        let span = Span::styled(
            format!("{}{}", marker, item.label),
            Style::default().fg(fg).bg(row_bg),
        );
        buf.set_span(inner.x, y, &span, inner.width);
    }

    // 스크롤 표시
    let indicator = Style::default().fg(c.text_secondary.to_color()).bg(bg);
    let right = area.x + area.width - 2;
    if scroll > 0 {
        buf.set_string(right, area.y, "▲", indicator);
    }
    if scroll + (inner.height as usize) < rows.len() {
        buf.set_string(right, area.y + area.height - 1, "▼", indicator);
    }
}
