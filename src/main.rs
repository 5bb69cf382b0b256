// 복슬 UI 데모 - 모든 컴포넌트를 한 화면에
//
// Tab/Shift+Tab: 포커스 이동, F2: light/dark 전환, F3: 등록된 테마 순환, F10: 종료
// BOKSL_UI_LOG=<파일>로 로그 파일 지정 (RUST_LOG로 레벨 지정)

use anyhow::Context;
use boksl_ui::utils::time::format_time_with_seconds;
use boksl_ui::{
    get_current_time, render_with_provider, Component, CustomButton, CustomDropdown,
    CustomSearchBar, DropdownOption, EventOutcome, SimpleDropdown, TextInput, ThemeProvider,
    ThemeRegistry, UiConfig,
};
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

const FOCUS_COUNT: usize = 5;

/// 호스트 상태 (컴포넌트는 콜백으로만 변경을 알림)
#[derive(Debug, Default)]
struct HostState {
    name: String,
    query: String,
    last_search: Option<String>,
    size: Option<String>,
    color: String,
    presses: usize,
    status: String,
}

struct DemoApp {
    state: Rc<RefCell<HostState>>,
    registry: ThemeRegistry,
    button: CustomButton,
    name_input: TextInput,
    search: CustomSearchBar,
    size_dropdown: CustomDropdown,
    color_dropdown: SimpleDropdown,
    focus: usize,
    should_quit: bool,
}

impl DemoApp {
    fn new(config: &UiConfig, registry: ThemeRegistry) -> Self {
        let state = Rc::new(RefCell::new(HostState {
            color: "Blue".to_string(),
            ..Default::default()
        }));

        let s = Rc::clone(&state);
        let button = CustomButton::new("Greet", move || {
            let mut st = s.borrow_mut();
            st.presses += 1;
            let greeting = format!("Hello, {}!", st.name.trim());
            st.status = greeting;
            Ok(())
        });

        let s = Rc::clone(&state);
        let name_input = TextInput::new("", move |text| {
            s.borrow_mut().name = text.to_string();
            Ok(())
        })
        .placeholder("Your name")
        .max_length(24);

        let s = Rc::clone(&state);
        let s2 = Rc::clone(&state);
        let search = CustomSearchBar::new("", move |text| {
            s.borrow_mut().query = text.to_string();
            Ok(())
        })
        .placeholder("Search themes")
        .debounce(config.search_debounce())
        .on_search(move |query| {
            s2.borrow_mut().last_search = Some(query.to_string());
            tracing::info!(%query, "search submitted");
            Ok(())
        });

        let s = Rc::clone(&state);
        let size_dropdown = CustomDropdown::new(
            vec![
                DropdownOption::new("Small", "s"),
                DropdownOption::new("Medium", "m"),
                DropdownOption::new("Large", "l"),
                DropdownOption::new("Huge (sold out)", "xl").enabled(false),
            ],
            move |value| {
                s.borrow_mut().size = Some(value.to_string());
                Ok(())
            },
        )
        .label("Size")
        .placeholder("Pick a size");

        let s = Rc::clone(&state);
        let color_dropdown = SimpleDropdown::new(
            vec!["Red".into(), "Green".into(), "Blue".into()],
            "Blue",
            move |value| {
                s.borrow_mut().color = value.to_string();
                Ok(())
            },
        );

        let mut app = Self {
            state,
            registry,
            button,
            name_input,
            search,
            size_dropdown,
            color_dropdown,
            focus: 0,
            should_quit: false,
        };
        app.sync_focus();
        app.sync_props();
        app
    }

    fn focused_mut(&mut self) -> &mut dyn Component {
        match self.focus {
            0 => &mut self.name_input,
            1 => &mut self.search,
            2 => &mut self.size_dropdown,
            3 => &mut self.color_dropdown,
            _ => &mut self.button,
        }
    }

    fn sync_focus(&mut self) {
        self.name_input.set_focused(self.focus == 0);
        self.search.set_focused(self.focus == 1);
        self.size_dropdown.set_focused(self.focus == 2);
        self.color_dropdown.set_focused(self.focus == 3);
        self.button.set_focused(self.focus == 4);
    }

    /// 호스트 상태를 props로 반영 (제어형 컴포넌트)
    fn sync_props(&mut self) {
        let st = self.state.borrow();
        self.name_input.set_value(st.name.clone());
        self.search.set_value(st.query.clone());
        self.size_dropdown.set_selected(st.size.clone());
        self.color_dropdown.set_selected(st.color.clone());
        self.button.set_disabled(st.name.trim().is_empty());
    }

    fn handle_event(&mut self, event: &Event, provider: &ThemeProvider) -> anyhow::Result<()> {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::F(10) => {
                        self.should_quit = true;
                        return Ok(());
                    }
                    KeyCode::F(2) => {
                        provider.toggle_theme()?;
                        return Ok(());
                    }
                    KeyCode::F(3) => {
                        let current = provider.use_app_theme();
                        let next = self.registry.next_after(&current.name).clone();
                        provider.set_theme(next)?;
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        // 마우스는 버튼에 직접 전달
        if matches!(event, Event::Mouse(_)) {
            self.button.handle_event(event)?;
            self.sync_props();
            return Ok(());
        }

        let outcome = self.focused_mut().handle_event(event)?;
        if outcome == EventOutcome::Ignored {
            if let Event::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Tab => self.focus = (self.focus + 1) % FOCUS_COUNT,
                        KeyCode::BackTab => {
                            self.focus = (self.focus + FOCUS_COUNT - 1) % FOCUS_COUNT
                        }
                        _ => {}
                    }
                    self.sync_focus();
                }
            }
        }
        self.sync_props();
        Ok(())
    }

    fn render(&self, f: &mut Frame, provider: &ThemeProvider) -> boksl_ui::Result<()> {
        let theme = provider.use_app_theme();
        let area = f.area();
        let bg = theme.colors.background.to_color();
        f.buffer_mut().set_style(area, Style::default().bg(bg));

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        let title = Line::from(vec![Span::styled(
            format!(" 복슬 UI · theme: {} ", theme.name),
            Style::default()
                .fg(theme.colors.primary.to_color())
                .add_modifier(theme.typography.title.to_modifier()),
        )]);
        f.render_widget(Paragraph::new(title), rows[0]);

        let buf = f.buffer_mut();
        render_with_provider(&self.name_input, provider, rows[1], buf)?;
        render_with_provider(&self.search, provider, rows[2], buf)?;
        render_with_provider(&self.button, provider, centered(rows[4], 20), buf)?;

        // 오버레이가 다른 위젯 위에 그려지도록 드롭다운은 마지막에
        let [left, right] = Layout::horizontal([Constraint::Percentage(50); 2]).areas(rows[3]);
        let dropdown_area = |r: Rect| Rect {
            height: r.height + rows[5].height,
            ..r
        };
        render_with_provider(&self.color_dropdown, provider, dropdown_area(right), buf)?;
        render_with_provider(&self.size_dropdown, provider, dropdown_area(left), buf)?;

        let st = self.state.borrow();
        let status = format!(
            " {} | {} | presses: {} | search: {} | {}",
            get_current_time(),
            format_time_with_seconds(&Local::now().time()),
            st.presses,
            st.last_search.as_deref().unwrap_or("-"),
            st.status
        );
        f.render_widget(
            Paragraph::new(status).style(
                Style::default()
                    .fg(theme.colors.on_primary.to_color())
                    .bg(theme.colors.primary.to_color()),
            ),
            rows[6],
        );
        Ok(())
    }
}

/// 가로 가운데 정렬된 영역
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn init_logging() -> anyhow::Result<()> {
    let Some(path) = std::env::var_os("BOKSL_UI_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("cannot create log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = UiConfig::load().context("failed to load config")?;
    let mut registry = ThemeRegistry::new();
    if let Some(dir) = config.theme_dir() {
        registry.load_themes_from_dir(&dir)?;
    }
    let initial = registry.get(&config.default_theme).cloned().unwrap_or_else(|| {
        tracing::warn!(name = %config.default_theme, "unknown default theme, using light");
        boksl_ui::light_theme()
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = DemoApp::new(&config, registry);
    let provider = ThemeProvider::new();

    // Run app
    let res = provider.provide(Some(initial), |p| run_app(&mut terminal, &mut app, p));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.search.unmount();
    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut DemoApp,
    provider: &ThemeProvider,
) -> anyhow::Result<()> {
    loop {
        let mut render_result = Ok(());
        terminal.draw(|f| render_result = app.render(f, provider))?;
        render_result?;

        // 검색 예약이 있으면 그 시각까지만 대기
        let now = Instant::now();
        let poll_timeout = app
            .search
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(Duration::from_millis(250))
            .min(Duration::from_millis(250));

        if event::poll(poll_timeout)? {
            let event = event::read()?;
            app.handle_event(&event, provider)?;
        }

        if app.search.tick(Instant::now())? {
            app.sync_props();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
