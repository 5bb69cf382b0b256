// Text edit buffer - 편집 세션 버퍼
//
// 커서는 항상 UTF-8 문자 경계(바이트 인덱스)에 위치합니다.

use super::{is_ctrl_char, is_plain};
use crossterm::event::{KeyCode, KeyEvent};

/// 편집 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    DeletePrevWord,
    Left,
    Right,
    Home,
    End,
}

impl EditAction {
    /// 키 입력을 편집 동작으로 변환
    pub(crate) fn from_key(key: &KeyEvent) -> Option<Self> {
        if is_ctrl_char(key, 'w') {
            return Some(EditAction::DeletePrevWord);
        }
        if !is_plain(key) {
            return None;
        }

        let action = match key.code {
            KeyCode::Char(c) => EditAction::Insert(c),
            KeyCode::Backspace => EditAction::Backspace,
            KeyCode::Delete => EditAction::Delete,
            KeyCode::Left => EditAction::Left,
            KeyCode::Right => EditAction::Right,
            KeyCode::Home => EditAction::Home,
            KeyCode::End => EditAction::End,
            _ => return None,
        };
        Some(action)
    }

    /// 값을 바꾸는 동작인지 (커서 이동 제외)
    pub(crate) fn is_edit(self) -> bool {
        matches!(
            self,
            EditAction::Insert(_)
                | EditAction::Backspace
                | EditAction::Delete
                | EditAction::DeletePrevWord
        )
    }
}

/// 값 사본 + 커서
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditBuffer {
    pub value: String,
    pub cursor: usize,
}

impl EditBuffer {
    /// 커서를 값 범위/문자 경계로 보정해서 생성
    pub(crate) fn new(value: &str, cursor: usize) -> Self {
        Self {
            value: value.to_string(),
            cursor: clamp_cursor(value, cursor),
        }
    }

    /// 동작 적용
    pub(crate) fn apply(&mut self, action: EditAction) {
        match action {
            EditAction::Insert(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            EditAction::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_start(&self.value, self.cursor);
                    self.value.remove(prev);
                    self.cursor = prev;
                }
            }
            EditAction::Delete => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                }
            }
            EditAction::DeletePrevWord => self.delete_prev_word(),
            EditAction::Left => {
                if self.cursor > 0 {
                    self.cursor = prev_char_start(&self.value, self.cursor);
                }
            }
            EditAction::Right => {
                if let Some(c) = self.value[self.cursor..].chars().next() {
                    self.cursor += c.len_utf8();
                }
            }
            EditAction::Home => self.cursor = 0,
            EditAction::End => self.cursor = self.value.len(),
        }
    }

    fn delete_prev_word(&mut self) {
        let end = self.cursor;
        let mut pos = end;

        // 커서 왼쪽 구분자 건너뛰기
        while pos > 0 {
            let prev = prev_char_start(&self.value, pos);
            if !self.value[prev..pos].starts_with(is_word_delimiter) {
                break;
            }
            pos = prev;
        }
        // 단어 시작까지
        while pos > 0 {
            let prev = prev_char_start(&self.value, pos);
            if self.value[prev..pos].starts_with(is_word_delimiter) {
                break;
            }
            pos = prev;
        }

        self.value.replace_range(pos..end, "");
        self.cursor = pos;
    }
}

/// 커서를 `value.len()` 이하의 문자 경계로 보정
pub(crate) fn clamp_cursor(value: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(value.len());
    while !value.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

fn prev_char_start(value: &str, cursor: usize) -> usize {
    value[..cursor]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn is_word_delimiter(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '/' | '\\' | ':' | ';' | ',' | '.' | '|' | '(' | ')' | '[' | ']' | '{' | '}' | '"'
                | '\''
                | '-'
                | '_'
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_insert_backspace_delete_utf8() {
        let mut buf = EditBuffer::new("\u{AC00}\u{B098}", "\u{AC00}".len());

        buf.apply(EditAction::Insert('\u{B2E4}'));
        assert_eq!(buf.value, "\u{AC00}\u{B2E4}\u{B098}");
        assert_eq!(buf.cursor, "\u{AC00}\u{B2E4}".len());

        buf.apply(EditAction::Backspace);
        assert_eq!(buf.value, "\u{AC00}\u{B098}");

        buf.apply(EditAction::Home);
        buf.apply(EditAction::Delete);
        assert_eq!(buf.value, "\u{B098}");
        assert_eq!(buf.cursor, 0);
    }

    #[test]
    fn test_cursor_moves_by_char() {
        let mut buf = EditBuffer::new("a\u{AC00}b", usize::MAX);
        assert_eq!(buf.cursor, buf.value.len());

        buf.apply(EditAction::Left);
        buf.apply(EditAction::Left);
        assert_eq!(buf.cursor, 1);
        buf.apply(EditAction::Right);
        assert_eq!(buf.cursor, "a\u{AC00}".len());
        buf.apply(EditAction::End);
        buf.apply(EditAction::Right);
        assert_eq!(buf.cursor, buf.value.len());
    }

    #[test]
    fn test_clamp_cursor_inside_multibyte_char() {
        assert_eq!(clamp_cursor("\u{AC00}", 2), 0);
        assert_eq!(clamp_cursor("ab", 10), 2);
    }

    #[test]
    fn test_delete_prev_word() {
        let mut buf = EditBuffer::new("rust ratatui  ", usize::MAX);
        buf.apply(EditAction::DeletePrevWord);
        assert_eq!(buf.value, "rust ");
        buf.apply(EditAction::DeletePrevWord);
        assert_eq!(buf.value, "");
        buf.apply(EditAction::DeletePrevWord);
        assert_eq!(buf.value, "");
    }

    #[test]
    fn test_key_mapping() {
        let ctrl_w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(EditAction::from_key(&ctrl_w), Some(EditAction::DeletePrevWord));

        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(EditAction::from_key(&shifted), Some(EditAction::Insert('A')));

        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(EditAction::from_key(&alt), None);

        assert!(!EditAction::Left.is_edit());
        assert!(EditAction::Backspace.is_edit());
    }
}
