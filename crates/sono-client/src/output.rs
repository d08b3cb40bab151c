use serde::{Deserialize, Serialize};

const LINE_BREAK: &str = "<br>";
const EXPANDED_TAB: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// How tab characters in console output are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabExpansion {
    /// Four non-breaking spaces, as the first server revision expected.
    Expand,
    /// Leave tabs to the renderer.
    #[default]
    Preserve,
}

/// Append-only console log, kept as markup.
///
/// Nothing is ever truncated; a long session grows without bound.
#[derive(Debug, Default)]
pub struct OutputLog {
    markup: String,
    line_breaks: usize,
    expansion: TabExpansion,
}

impl OutputLog {
    pub fn new(expansion: TabExpansion) -> Self {
        Self {
            expansion,
            ..Self::default()
        }
    }

    /// Transliterate a chunk and append it after everything written so far.
    /// Returns the markup fragment that was appended.
    pub fn append(&mut self, chunk: &str) -> &str {
        let start = self.markup.len();
        for c in chunk.chars() {
            match c {
                '\n' => {
                    self.markup.push_str(LINE_BREAK);
                    self.line_breaks += 1;
                }
                '\t' if self.expansion == TabExpansion::Expand => {
                    self.markup.push_str(EXPANDED_TAB);
                }
                _ => self.markup.push(c),
            }
        }
        &self.markup[start..]
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Line breaks written so far.
    pub const fn line_breaks(&self) -> usize {
        self.line_breaks
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }
}

/// Tags the server wraps output in. Anything else starting with `<` is text.
const SERVER_TAGS: &[&str] = &["span", "br", "details", "summary", "i"];

/// Length of the server tag at the start of `s`, if there is one.
fn server_tag_len(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('<')?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    if !SERVER_TAGS.contains(&&rest[..name_len]) {
        return None;
    }
    if !matches!(rest[name_len..].chars().next(), Some('>' | ' ')) {
        return None;
    }
    s.find('>').map(|end| end + 1)
}

/// Render an `OUT` body for a plain terminal.
///
/// Styling tags the server adds are dropped and escaped entities decoded.
/// Error text arrives unescaped, so any other `<` is kept as written.
pub fn to_plain(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(pos) = rest.find('<') {
        text.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match server_tag_len(tail) {
            Some(len) => rest = &tail[len..],
            None => {
                text.push('<');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_breaks() {
        let mut log = OutputLog::new(TabExpansion::Preserve);
        assert_eq!(log.append("a\nb\n"), "a<br>b<br>");
        assert_eq!(log.line_breaks(), 2);
        assert_eq!(log.markup(), "a<br>b<br>");
    }

    #[test]
    fn test_append_is_monotonic() {
        let mut log = OutputLog::new(TabExpansion::Preserve);
        log.append("> ");
        let before = log.markup().to_string();
        log.append("1\n\n");
        assert!(log.markup().starts_with(&before));
        assert_eq!(log.markup(), "> 1<br><br>");
        assert_eq!(log.line_breaks(), 2);
    }

    #[test]
    fn test_tab_expansion() {
        let mut expanded = OutputLog::new(TabExpansion::Expand);
        assert_eq!(expanded.append("\t0:"), "&nbsp;&nbsp;&nbsp;&nbsp;0:");

        let mut preserved = OutputLog::new(TabExpansion::Preserve);
        assert_eq!(preserved.append("\t0:"), "\t0:");
    }

    #[test]
    fn test_markup_in_chunk_is_kept_verbatim() {
        let mut log = OutputLog::new(TabExpansion::Preserve);
        log.append("<span class=\"red\">error</span>\n");
        assert_eq!(log.markup(), "<span class=\"red\">error</span><br>");
    }

    #[test]
    fn test_to_plain() {
        assert_eq!(
            to_plain("<span class=\"blue\">\t[1, 2] &lt;ok&gt; &amp;</span>\n"),
            "\t[1, 2] <ok> &\n"
        );
        assert_eq!(to_plain("a&nbsp;b"), "a b");
        assert_eq!(to_plain("> "), "> ");
    }

    #[test]
    fn test_to_plain_keeps_unescaped_angle_brackets() {
        assert_eq!(
            to_plain("<span class=\"red\">Cannot index value of type <Number> with 3</span>\n"),
            "Cannot index value of type <Number> with 3\n"
        );
        assert_eq!(to_plain("a < b and c > d"), "a < b and c > d");
        assert_eq!(to_plain("<spanner>"), "<spanner>");
    }

    #[test]
    fn test_to_plain_strips_vector_fold() {
        let body = "\n<details class=\"fold\"><summary>Raw Output Vector (2 <i class=\"fab fa-buffer\"></i>)</summary>\t0:\t1\n\t1:\t2\n</details>\n";
        assert_eq!(to_plain(body), "\nRaw Output Vector (2 )\t0:\t1\n\t1:\t2\n\n");
    }
}
