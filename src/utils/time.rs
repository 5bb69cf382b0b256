// Time utility - 현재 시각 표시 문자열

use chrono::{Local, NaiveDateTime, Timelike};

/// 시계 추상화
///
/// 테스트에서는 수동으로 진행하는 시계를 주입할 수 있습니다.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// 시스템 로컬 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 현재 시각을 "HH:MM" 형식으로 반환 (24시간제, 5자 고정)
///
/// # Examples
/// ```
/// use boksl_ui::get_current_time;
///
/// let now = get_current_time();
/// assert_eq!(now.len(), 5);
/// assert_eq!(&now[2..3], ":");
/// ```
pub fn get_current_time() -> String {
    current_time_with(&SystemClock)
}

/// 주어진 시계로 현재 시각 포맷팅
pub fn current_time_with(clock: &impl Clock) -> String {
    format_time(&clock.now())
}

/// 시:분 포맷팅
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use boksl_ui::utils::time::format_time;
///
/// let t = NaiveTime::from_hms_opt(9, 5, 42).unwrap();
/// assert_eq!(format_time(&t), "09:05");
/// ```
pub fn format_time<T: Timelike>(time: &T) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// 시:분:초 포맷팅 (데모 상태줄 전용)
pub fn format_time_with_seconds<T: Timelike>(time: &T) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}
