// Custom search bar component - 검색바 컴포넌트
//
// TextInput + 지우기 + 디바운스 검색
// 디바운스는 스레드가 아니라 호스트 루프가 tick()으로 확인하는 예약 상태입니다.

use super::text_input::{InputEvent, TextInput};
use super::{
    is_ctrl_char, key_press, themed_block, Callback, Component, EventOutcome, ValueCallback,
};
use crate::ui::theme::Theme;
use crate::utils::config::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::utils::error::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use std::time::{Duration, Instant};

const SEARCH_ICON: &str = "⌕";
const CLEAR_ICON: &str = "×";

/// 디바운스 상태
#[derive(Debug, Clone, PartialEq, Eq)]
enum Debounce {
    Idle,
    Pending { query: String, deadline: Instant },
}

/// 검색바
pub struct CustomSearchBar {
    input: TextInput,
    on_search: Option<ValueCallback>,
    on_clear: Option<Callback>,
    debounce_delay: Duration,
    debounce: Debounce,
    focused: bool,
}

impl CustomSearchBar {
    pub fn new(
        value: impl Into<String>,
        on_change_text: impl FnMut(&str) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            input: TextInput::new(value, on_change_text).placeholder("Search"),
            on_search: None,
            on_clear: None,
            debounce_delay: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            debounce: Debounce::Idle,
            focused: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.input.set_placeholder(placeholder);
        self
    }

    /// 디바운스된 검색 콜백
    pub fn on_search(mut self, callback: impl FnMut(&str) -> anyhow::Result<()> + 'static) -> Self {
        self.on_search = Some(Box::new(callback));
        self
    }

    /// 지우기 콜백
    pub fn on_clear(mut self, callback: impl FnMut() -> anyhow::Result<()> + 'static) -> Self {
        self.on_clear = Some(Box::new(callback));
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.input.set_value(value);
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        self.input.set_focused(focused);
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// 예약된 검색이 있는지
    pub fn has_pending_search(&self) -> bool {
        matches!(self.debounce, Debounce::Pending { .. })
    }

    /// 다음 검색 예정 시각 (호스트 poll 타임아웃 계산용)
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.debounce {
            Debounce::Pending { deadline, .. } => Some(*deadline),
            Debounce::Idle => None,
        }
    }

    /// 입력 지우기
    ///
    /// 예약된 검색을 취소하고 on_change_text("")와 on_clear를 호출합니다.
    pub fn clear(&mut self) -> Result<()> {
        self.cancel_pending();
        self.input.emit_change("")?;
        if let Some(on_clear) = self.on_clear.as_mut() {
            on_clear()?;
        }
        Ok(())
    }

    /// 예약 시각이 지났으면 검색 실행, 실행했으면 true
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let query = match &self.debounce {
            Debounce::Pending { deadline, query } if now >= *deadline => query.clone(),
            _ => return Ok(false),
        };

        self.debounce = Debounce::Idle;
        tracing::debug!(%query, "debounced search fired");
        self.run_search(&query)?;
        Ok(true)
    }

    /// 지정 시각 기준으로 이벤트 처리 (디바운스 예약 기준 시각)
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> Result<EventOutcome> {
        if let Some(key) = key_press(event) {
            let clear_key = (key.code == KeyCode::Esc && key.modifiers.is_empty())
                || is_ctrl_char(key, 'u');
            if clear_key {
                if self.input.value().is_empty() && !self.has_pending_search() {
                    return Ok(EventOutcome::Ignored);
                }
                self.clear()?;
                return Ok(EventOutcome::Consumed);
            }

            if key.code == KeyCode::Enter && key.modifiers.is_empty() && self.on_search.is_some()
            {
                let query = match std::mem::replace(&mut self.debounce, Debounce::Idle) {
                    Debounce::Pending { query, .. } => query,
                    Debounce::Idle => self.input.value().to_string(),
                };
                self.run_search(&query)?;
                return Ok(EventOutcome::Consumed);
            }
        }

        Ok(match self.input.process(event)? {
            InputEvent::Changed(query) => {
                self.schedule(query, now);
                EventOutcome::Consumed
            }
            InputEvent::Submitted | InputEvent::Moved => EventOutcome::Consumed,
            InputEvent::Ignored => EventOutcome::Ignored,
        })
    }

    fn schedule(&mut self, query: String, now: Instant) {
        if self.on_search.is_none() {
            return;
        }
        let deadline = now + self.debounce_delay;
        tracing::trace!(%query, "search scheduled");
        self.debounce = Debounce::Pending { query, deadline };
    }

    fn cancel_pending(&mut self) {
        if let Debounce::Pending { query, .. } = &self.debounce {
            tracing::debug!(%query, "pending search cancelled");
        }
        self.debounce = Debounce::Idle;
    }

    fn run_search(&mut self, query: &str) -> Result<()> {
        if let Some(on_search) = self.on_search.as_mut() {
            on_search(query)?;
        }
        Ok(())
    }
}

impl Component for CustomSearchBar {
    fn render(&self, theme: &Theme, area: Rect, buf: &mut Buffer) -> Result<()> {
        let inner = if area.height >= 3 {
            let block = themed_block(theme, self.focused);
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };
        if inner.width < 4 || inner.height == 0 {
            return Ok(());
        }

        let c = &theme.colors;
        let bg = c.background.to_color();
        let icon_style = Style::default().fg(c.text_secondary.to_color()).bg(bg);
        let pad = theme.spacing.padding_x.min(1);
        buf.set_string(inner.x + pad, inner.y, SEARCH_ICON, icon_style);

        // 아이콘 + 간격, 오른쪽 지우기 표시 자리
        let left = pad + 1 + theme.spacing.gap;
        let right = if self.input.value().is_empty() { 0 } else { 2 };
        let line_area = Rect {
            x: inner.x + left,
            y: inner.y,
            width: inner.width.saturating_sub(left + right + pad),
            height: 1,
        };
        if line_area.width > 0 {
            self.input.render_line(theme, line_area, buf);
        }

        if right > 0 {
            let x = inner.x + inner.width - pad - 1;
            buf.set_string(x, inner.y, CLEAR_ICON, icon_style);
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<EventOutcome> {
        self.handle_event_at(event, Instant::now())
    }

    fn unmount(&mut self) {
        self.cancel_pending();
        self.input.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::*;
    use crate::ui::theme::dark_theme;
    use crossterm::event::KeyModifiers;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// (검색바, on_change_text 기록, on_search 기록)
    fn search_bar(value: &str) -> (CustomSearchBar, Log, Log) {
        let changes: Log = Rc::default();
        let searches: Log = Rc::default();
        let change_sink = Rc::clone(&changes);
        let search_sink = Rc::clone(&searches);

        let bar = CustomSearchBar::new(value, move |text| {
            change_sink.borrow_mut().push(text.to_string());
            Ok(())
        })
        .on_search(move |query| {
            search_sink.borrow_mut().push(query.to_string());
            Ok(())
        })
        .debounce(Duration::from_millis(300));

        (bar, changes, searches)
    }

    #[test]
    fn test_search_fires_after_debounce() {
        let (mut bar, changes, searches) = search_bar("ru");
        let start = Instant::now();

        bar.handle_event_at(&type_char('s'), start).unwrap();
        assert_eq!(*changes.borrow(), vec!["rus".to_string()]);
        assert!(bar.has_pending_search());

        assert!(!bar.tick(start + Duration::from_millis(299)).unwrap());
        assert!(searches.borrow().is_empty());

        assert!(bar.tick(start + Duration::from_millis(300)).unwrap());
        assert_eq!(*searches.borrow(), vec!["rus".to_string()]);
        assert!(!bar.tick(start + Duration::from_secs(5)).unwrap());
        assert_eq!(searches.borrow().len(), 1);
    }

    #[test]
    fn test_new_edit_restarts_debounce() {
        let (mut bar, _, searches) = search_bar("");
        let start = Instant::now();

        bar.handle_event_at(&type_char('a'), start).unwrap();
        bar.set_value("a");
        bar.handle_event_at(&type_char('b'), start + Duration::from_millis(200))
            .unwrap();

        assert!(!bar.tick(start + Duration::from_millis(400)).unwrap());
        assert!(bar.tick(start + Duration::from_millis(500)).unwrap());
        assert_eq!(*searches.borrow(), vec!["ab".to_string()]);
    }

    #[test]
    fn test_unmount_cancels_pending_search() {
        let (mut bar, _, searches) = search_bar("");
        let start = Instant::now();

        bar.handle_event_at(&type_char('x'), start).unwrap();
        bar.unmount();

        assert!(!bar.has_pending_search());
        assert!(!bar.tick(start + Duration::from_secs(10)).unwrap());
        assert!(searches.borrow().is_empty());
    }

    #[test]
    fn test_enter_submits_immediately() {
        let (mut bar, _, searches) = search_bar("");
        let start = Instant::now();

        bar.handle_event_at(&type_char('q'), start).unwrap();
        bar.handle_event_at(&press(KeyCode::Enter), start).unwrap();

        assert_eq!(*searches.borrow(), vec!["q".to_string()]);
        assert!(!bar.tick(start + Duration::from_secs(1)).unwrap());
        assert_eq!(searches.borrow().len(), 1);
    }

    #[test]
    fn test_enter_without_pending_uses_host_value() {
        let (mut bar, _, searches) = search_bar("rust");
        bar.handle_event_at(&press(KeyCode::Enter), Instant::now())
            .unwrap();
        assert_eq!(*searches.borrow(), vec!["rust".to_string()]);
    }

    #[test]
    fn test_clear_emits_empty_and_cancels() {
        let cleared = Rc::new(RefCell::new(0));
        let clear_count = Rc::clone(&cleared);
        let (bar, changes, searches) = search_bar("abc");
        let mut bar = bar.on_clear(move || {
            *clear_count.borrow_mut() += 1;
            Ok(())
        });
        let start = Instant::now();

        bar.handle_event_at(&press(KeyCode::Backspace), start)
            .unwrap();
        let outcome = bar.handle_event_at(&press(KeyCode::Esc), start).unwrap();

        assert_eq!(outcome, EventOutcome::Consumed);
        assert_eq!(*changes.borrow(), vec!["ab".to_string(), String::new()]);
        assert_eq!(*cleared.borrow(), 1);
        assert!(!bar.tick(start + Duration::from_secs(1)).unwrap());
        assert!(searches.borrow().is_empty());
    }

    #[test]
    fn test_ctrl_u_clears() {
        let (mut bar, changes, _) = search_bar("abc");
        bar.handle_event_at(
            &press_with(KeyCode::Char('u'), KeyModifiers::CONTROL),
            Instant::now(),
        )
        .unwrap();
        assert_eq!(*changes.borrow(), vec![String::new()]);
    }

    #[test]
    fn test_esc_on_empty_is_ignored() {
        let (mut bar, changes, _) = search_bar("");
        let outcome = bar
            .handle_event_at(&press(KeyCode::Esc), Instant::now())
            .unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_without_on_search_nothing_is_scheduled() {
        let mut bar = CustomSearchBar::new("", |_| Ok(()));
        bar.handle_event_at(&type_char('a'), Instant::now()).unwrap();
        assert!(!bar.has_pending_search());
        assert_eq!(bar.next_deadline(), None);
    }

    #[test]
    fn test_render_shows_icon_value_and_clear_mark() {
        let (bar, _, _) = search_bar("rust");
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        bar.render(&dark_theme(), area, &mut buf).unwrap();

        let line = row_text(&buf, area, 1);
        assert!(line.contains(SEARCH_ICON));
        assert!(line.contains("rust"));
        assert!(line.contains(CLEAR_ICON));
    }

    #[test]
    fn test_render_placeholder_without_clear_mark() {
        let (bar, _, _) = search_bar("");
        let bar = bar.placeholder("Find files");
        let area = Rect::new(0, 0, 24, 3);
        let mut buf = Buffer::empty(area);
        bar.render(&dark_theme(), area, &mut buf).unwrap();

        let line = row_text(&buf, area, 1);
        assert!(line.contains("Find files"));
        assert!(!line.contains(CLEAR_ICON));
    }
}
