use sono_protocol::ClientFrame;

use crate::history::CommandHistory;

/// Line-break artifact an editable region leaves at the end of its text.
const TRAILING_BREAK: &str = "<br>";

/// Keys the command line reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    ArrowUp,
    Escape,
    Backspace,
    Char(char),
    /// Anything else; left to native editing.
    Other,
}

/// Undo the entity escaping an editable markup region applies to typed text.
///
/// Every occurrence is replaced. `&amp;` goes last so `&amp;lt;` becomes `&lt;`.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Escape plain text the way an editable markup region stores it.
///
/// Inverse of [`unescape_html`]; `&` goes first so existing entities survive.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The single-line command region with its history.
#[derive(Debug, Default)]
pub struct CommandLine {
    buffer: String,
    history: CommandHistory,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Apply one keystroke. Returns the frame to send on `Enter`.
    pub fn handle_key(&mut self, key: Key) -> Option<ClientFrame> {
        match key {
            Key::Enter => Some(self.submit()),
            Key::ArrowUp => {
                if let Some(entry) = self.history.previous() {
                    self.buffer = entry.to_string();
                }
                None
            }
            Key::Escape => {
                self.buffer.clear();
                self.history.reset();
                None
            }
            Key::Backspace => {
                self.buffer.pop();
                None
            }
            Key::Char(c) => {
                self.buffer.push(c);
                None
            }
            Key::Other => None,
        }
    }

    /// Take the current text as a `CODE` frame, remembering it raw in history.
    pub fn submit(&mut self) -> ClientFrame {
        let raw = std::mem::take(&mut self.buffer);
        let text = raw.strip_suffix(TRAILING_BREAK).unwrap_or(&raw);
        let frame = ClientFrame::Code(unescape_html(text));
        self.history.push(raw);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(line: &mut CommandLine, text: &str) {
        for c in text.chars() {
            line.handle_key(Key::Char(c));
        }
    }

    #[test]
    fn test_unescape_replaces_every_occurrence() {
        assert_eq!(unescape_html("a &lt; b &lt; c"), "a < b < c");
        assert_eq!(unescape_html("&gt;&gt;&amp;&amp;"), ">>&&");
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
        assert_eq!(unescape_html("plain"), "plain");
    }

    #[test]
    fn test_escape_then_unescape_is_identity() {
        for text in ["s = \"a &amp; b\";", "x < y && y > z", "a<br>", "&lt;br&gt;", ""] {
            assert_eq!(unescape_html(&escape_html(text)), text);
        }
        assert_eq!(escape_html("a & <b>"), "a &amp; &lt;b&gt;");
    }

    #[test]
    fn test_enter_frames_unescaped_text() {
        let mut line = CommandLine::new();
        line.set_text("x &lt;- [1] &amp;&amp; y &gt; 2 &lt; 3<br>");
        let frame = line.handle_key(Key::Enter);
        assert_eq!(
            frame.map(|f| f.encode()).as_deref(),
            Some("CODE\nx <- [1] && y > 2 < 3")
        );
        assert_eq!(line.text(), "");
    }

    #[test]
    fn test_only_one_trailing_break_is_stripped() {
        let mut line = CommandLine::new();
        line.set_text("a<br><br>");
        assert_eq!(line.submit(), ClientFrame::Code("a<br>".into()));
        line.set_text("<br>a");
        assert_eq!(line.submit(), ClientFrame::Code("<br>a".into()));
    }

    #[test]
    fn test_history_keeps_raw_text() {
        let mut line = CommandLine::new();
        line.set_text("a &lt; b<br>");
        line.handle_key(Key::Enter);
        line.handle_key(Key::ArrowUp);
        assert_eq!(line.text(), "a &lt; b<br>");
    }

    #[test]
    fn test_arrow_up_then_escape() {
        let mut line = CommandLine::new();
        for cmd in ["first", "second"] {
            type_text(&mut line, cmd);
            line.handle_key(Key::Enter);
        }
        line.handle_key(Key::ArrowUp);
        assert_eq!(line.text(), "second");
        line.handle_key(Key::ArrowUp);
        assert_eq!(line.text(), "first");
        line.handle_key(Key::ArrowUp);
        assert_eq!(line.text(), "first");

        line.handle_key(Key::Escape);
        assert_eq!(line.text(), "");
        assert_eq!(line.history().cursor(), 0);
        line.handle_key(Key::ArrowUp);
        assert_eq!(line.text(), "second");
    }

    #[test]
    fn test_submit_resets_cursor() {
        let mut line = CommandLine::new();
        type_text(&mut line, "a");
        line.handle_key(Key::Enter);
        line.handle_key(Key::ArrowUp);
        assert_eq!(line.history().cursor(), 1);
        line.handle_key(Key::Enter);
        assert_eq!(line.history().cursor(), 0);
        assert_eq!(line.history().len(), 2);
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut line = CommandLine::new();
        type_text(&mut line, "abc");
        assert_eq!(line.handle_key(Key::Other), None);
        line.handle_key(Key::Backspace);
        assert_eq!(line.text(), "ab");
    }
}
