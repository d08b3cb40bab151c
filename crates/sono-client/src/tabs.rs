use std::collections::HashMap;

use tracing::debug;

/// Tab that exists from the start of every session.
pub const DEFAULT_TAB: &str = "untitled.so";

pub fn untitled_name(n: usize) -> String {
    format!("untitled{n}.so")
}

/// Open file tabs sharing one editor buffer.
///
/// The active tab's text lives in `editor`; every other tab's text lives in
/// `cache`. The active tab's cache slot is stale until it is switched away from.
#[derive(Debug)]
pub struct TabManager {
    cache: HashMap<String, String>,
    order: Vec<String>,
    active: String,
    editor: String,
    pending: String,
    counter: usize,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManager {
    pub fn new() -> Self {
        let counter = 1;
        Self {
            cache: HashMap::from([(DEFAULT_TAB.to_string(), String::new())]),
            order: vec![DEFAULT_TAB.to_string()],
            active: DEFAULT_TAB.to_string(),
            editor: String::new(),
            pending: untitled_name(counter),
            counter,
        }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Name the next created tab will get.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_pending(&mut self, name: impl Into<String>) {
        self.pending = name.into();
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.order.iter().any(|n| n == name)
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    pub fn set_editor(&mut self, text: impl Into<String>) {
        self.editor = text.into();
    }

    /// Current text of a tab: the editor for the active one, the cache otherwise.
    pub fn content(&self, name: &str) -> Option<&str> {
        if name == self.active {
            Some(&self.editor)
        } else {
            self.cache.get(name).map(String::as_str)
        }
    }

    /// Store `content` under the pending name and switch to it.
    ///
    /// Re-creating an existing tab replaces its content. Returns the tab name.
    pub fn create_tab(&mut self, content: impl Into<String>) -> String {
        let name = std::mem::take(&mut self.pending);
        self.flush_active();
        self.cache.insert(name.clone(), content.into());
        if !self.contains(&name) {
            self.order.push(name.clone());
        }
        self.activate(&name);
        self.pending = untitled_name(self.counter);
        debug!(tab = %name, "created tab");
        name
    }

    /// Open an empty `untitled<N>.so` tab.
    pub fn new_tab(&mut self) -> String {
        self.counter += 1;
        self.create_tab(String::new())
    }

    /// Switch the editor to `name`. Unknown names are refused.
    pub fn open_tab(&mut self, name: &str) -> bool {
        if !self.contains(name) {
            debug!(tab = %name, "refusing to open unknown tab");
            return false;
        }
        self.flush_active();
        self.activate(name);
        true
    }

    /// Close `name`, moving to its neighbour first if it is active.
    ///
    /// The last remaining tab, and unknown names, are refused. The cache entry
    /// is left in place.
    pub fn close_tab(&mut self, name: &str) -> bool {
        if self.order.len() <= 1 {
            debug!(tab = %name, "refusing to close last tab");
            return false;
        }
        let Some(pos) = self.order.iter().position(|n| n == name) else {
            debug!(tab = %name, "refusing to close unknown tab");
            return false;
        };
        if self.active == name {
            let neighbour = if pos > 0 {
                self.order[pos - 1].clone()
            } else {
                self.order[pos + 1].clone()
            };
            self.open_tab(&neighbour);
        }
        self.order.remove(pos);
        true
    }

    /// Tab strip markup; the active tab carries `selectedtab`.
    pub fn render_strip(&self) -> String {
        self.order
            .iter()
            .map(|name| {
                let class = if *name == self.active {
                    "tablinks selectedtab"
                } else {
                    "tablinks"
                };
                format!(
                    "<li class=\"{class}\" id=\"{name}\">\
                     <button class=\"opentab\" onclick=\"openTab('{name}')\"><i class=\"fas fa-file-code\"></i>{name}</button>\
                     <button class=\"closetab\" onclick=\"closeTab('{name}')\"><i class=\"fas fa-times-circle\"></i></button>\
                     </li>"
                )
            })
            .collect()
    }

    fn flush_active(&mut self) {
        self.cache.insert(self.active.clone(), self.editor.clone());
    }

    fn activate(&mut self, name: &str) {
        self.active = name.to_string();
        self.editor = self.cache.get(name).cloned().unwrap_or_default();
    }
}
