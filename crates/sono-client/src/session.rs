use sono_protocol::{ClientFrame, ServerFrame};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::input::{CommandLine, Key, escape_html, unescape_html};
use crate::output::OutputLog;
use crate::tabs::TabManager;

/// What applying an inbound frame changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Output was appended; carries the raw body.
    Output(String),
    /// A tab was created (or refilled) and made active.
    TabCreated(String),
    Status { running: bool },
    /// Unknown header; nothing changed.
    Ignored,
}

/// All client-side state of one REPL session. Owns no I/O.
#[derive(Debug)]
pub struct Session {
    tabs: TabManager,
    command_line: CommandLine,
    output: OutputLog,
    running: bool,
    initialized: bool,
    examples: Vec<String>,
}

impl Session {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            tabs: TabManager::new(),
            command_line: CommandLine::new(),
            output: OutputLog::new(config.tab_expansion),
            running: false,
            initialized: false,
            examples: config.examples.clone(),
        }
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabManager {
        &mut self.tabs
    }

    pub fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// False until the first inbound message arrives.
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Apply one decoded server frame.
    pub fn apply(&mut self, frame: ServerFrame) -> Update {
        if !self.initialized {
            self.initialized = true;
            info!("Session ready");
        }
        match frame {
            ServerFrame::Out(body) => {
                self.output.append(&body);
                Update::Output(body)
            }
            ServerFrame::File(contents) => Update::TabCreated(self.tabs.create_tab(contents)),
            ServerFrame::Status { running } => {
                self.running = running;
                Update::Status { running }
            }
            ServerFrame::Unknown { header, .. } => {
                debug!(%header, "Ignoring frame with unknown header");
                Update::Ignored
            }
        }
    }

    /// Keystroke in the command line.
    pub fn key(&mut self, key: Key) -> Option<ClientFrame> {
        self.command_line.handle_key(key)
    }

    /// Submit plain text, such as a terminal line, through the command line.
    ///
    /// The text is escaped first so it reaches the server exactly as given.
    pub fn submit_line(&mut self, text: &str) -> ClientFrame {
        self.command_line.set_text(escape_html(text));
        self.command_line.submit()
    }

    /// Recall the previous command into the command line, returned as plain text.
    pub fn recall_previous(&mut self) -> String {
        self.command_line.handle_key(Key::ArrowUp);
        unescape_html(self.command_line.text())
    }

    pub fn cancel_line(&mut self) {
        self.command_line.handle_key(Key::Escape);
    }

    /// Run the editor buffer, unless a previous run is still outstanding.
    pub fn run(&self) -> Option<ClientFrame> {
        if self.running {
            debug!("Run skipped; previous run still in progress");
            return None;
        }
        Some(ClientFrame::Code(self.tabs.editor().to_string()))
    }

    /// Request an example file; the reply lands in a tab with this name.
    pub fn load_example(&mut self, filename: &str) -> ClientFrame {
        self.tabs.set_pending(filename);
        ClientFrame::File(filename.to_string())
    }

    /// Run button icon for the current running flag.
    pub fn run_button(&self) -> &'static str {
        if self.running {
            r#"<button id="runbutton" class="spinning"><i class="fas fa-redo-alt"></i></button>"#
        } else {
            r#"<button id="runbutton"><i class="far fa-play-circle"></i></button>"#
        }
    }
}
