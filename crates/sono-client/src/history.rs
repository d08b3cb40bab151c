/// Submitted command lines, walked backwards from the most recent.
#[derive(Debug, Default, Clone)]
pub struct CommandHistory {
    entries: Vec<String>,
    index: usize,
}

impl CommandHistory {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
        }
    }

    /// Record a submission and reset the cursor.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
        self.index = 0;
    }

    /// Step one entry further back. Returns `None` once the oldest entry
    /// has been reached, leaving the cursor where it is.
    pub fn previous(&mut self) -> Option<&str> {
        if self.index >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.entries.len() - self.index])
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub const fn cursor(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
