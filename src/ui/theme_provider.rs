// Theme provider - 활성 테마 스코프
//
// 전역 상태 없이 명시적인 스택으로 테마를 전달합니다.
// provide()가 테마를 push하고 렌더 콜백이 끝나면 pop합니다 (panic 시에도).

use super::theme::{dark_theme, light_theme, Theme};
use crate::utils::error::{Result, UiError};
use std::cell::RefCell;
use std::rc::Rc;

/// 테마 프로바이더
///
/// 렌더 스레드 전용 (Rc/RefCell). 가장 안쪽 스코프의 테마가 우선합니다.
#[derive(Debug)]
pub struct ThemeProvider {
    stack: RefCell<Vec<Rc<Theme>>>,
    default_theme: Rc<Theme>,
}

/// 스코프 종료 시 pop
struct ScopeGuard<'a> {
    provider: &'a ThemeProvider,
    depth: usize,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.provider.stack.borrow_mut();
        stack.truncate(self.depth - 1);
        tracing::trace!(depth = stack.len(), "theme scope popped");
    }
}

impl ThemeProvider {
    /// 기본 테마(light)를 폴백으로 사용하는 프로바이더
    pub fn new() -> Self {
        Self::with_default(light_theme())
    }

    /// 스코프 밖 조회 시 돌려줄 기본 테마 지정
    pub fn with_default(theme: Theme) -> Self {
        Self {
            stack: RefCell::new(Vec::new()),
            default_theme: Rc::new(theme),
        }
    }

    /// 테마 스코프 안에서 render 실행
    ///
    /// `theme`이 `None`이면 기본 테마를 사용합니다.
    /// render가 끝나면 (정상 종료든 unwind든) 바깥 스코프의 테마가 복원됩니다.
    pub fn provide<R>(&self, theme: Option<Theme>, render: impl FnOnce(&Self) -> R) -> R {
        let theme = theme
            .map(Rc::new)
            .unwrap_or_else(|| Rc::clone(&self.default_theme));

        let depth = {
            let mut stack = self.stack.borrow_mut();
            stack.push(theme);
            stack.len()
        };
        tracing::trace!(depth, "theme scope pushed");

        let _guard = ScopeGuard {
            provider: self,
            depth,
        };
        render(self)
    }

    /// 가장 가까운 스코프의 테마
    ///
    /// 스코프가 없으면 기본 테마를 반환합니다 (에러가 필요하면 `try_use_app_theme`).
    pub fn use_app_theme(&self) -> Rc<Theme> {
        self.stack
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| Rc::clone(&self.default_theme))
    }

    /// 스코프 밖이면 `UiError::NoThemeProvider`
    pub fn try_use_app_theme(&self) -> Result<Rc<Theme>> {
        self.stack
            .borrow()
            .last()
            .cloned()
            .ok_or(UiError::NoThemeProvider)
    }

    /// 가장 안쪽 스코프의 테마 교체 (테마 prop 변경)
    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        let mut stack = self.stack.borrow_mut();
        let slot = stack.last_mut().ok_or(UiError::NoThemeProvider)?;
        tracing::debug!(from = %slot.name, to = %theme.name, "theme changed");
        *slot = Rc::new(theme);
        Ok(())
    }

    /// light <-> dark 전환 (가장 안쪽 스코프)
    ///
    /// dark가 아닌 테마(커스텀 포함)는 dark로 전환됩니다.
    pub fn toggle_theme(&self) -> Result<()> {
        let next = if self.try_use_app_theme()?.is_dark() {
            light_theme()
        } else {
            dark_theme()
        };
        self.set_theme(next)
    }

    /// 현재 중첩 깊이
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }
}

impl Default for ThemeProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// 가장 가까운 스코프의 테마 (스코프 밖이면 기본 테마)
pub fn use_app_theme(provider: &ThemeProvider) -> Rc<Theme> {
    provider.use_app_theme()
}
