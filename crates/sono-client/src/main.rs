use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use sono_client::input::{Key, unescape_html};
use sono_client::output::{TabExpansion, to_plain};
use sono_client::{ClientConfig, Router, Session, Transport, Update, WsTransport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sono", about = "Terminal REPL for a Sono interpreter server")]
struct Args {
    /// Server URL (ws:// or wss://)
    #[arg(short, long, env = "SONO_ENDPOINT")]
    endpoint: Option<String>,
    /// Config file (defaults to <config dir>/sono/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Render tabs in output as four spaces, for old servers
    #[arg(long)]
    expand_tabs: bool,
    /// Open local files as tabs before connecting
    #[arg(short, long = "open", value_name = "FILE")]
    open: Vec<PathBuf>,
    /// Write the output log as markup to this file on exit
    #[arg(long)]
    transcript: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the example files the server offers
    Examples,
}

const HELP: &str = "\
Lines are sent to the interpreter as typed. Commands:
  :run              run the active tab
  :edit             replace the active tab's text (end with a lone '.')
  :show             print the active tab's text
  :new              open an empty tab
  :open <name>      switch to a tab
  :close [name]     close a tab (default: the active one)
  :tabs             list tabs
  :examples         list example files
  :load <file>      load an example file into a tab
  :prev             recall the previous command; an empty line sends it
  :cancel           clear the command line
  :history          list submitted commands
  :status           show connection and run state
  :quit             exit";

enum Flow {
    Continue,
    Quit,
}

fn tab_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn render(update: &Update) {
    match update {
        Update::Output(body) => {
            print!("{}", to_plain(body));
            let _ = std::io::stdout().flush();
        }
        Update::TabCreated(name) => println!("[tab {name}]"),
        Update::Status { running: true } => println!("[running]"),
        Update::Status { running: false } => println!("[idle]"),
        Update::Ignored => {}
    }
}

async fn read_buffer<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> eyre::Result<String> {
    let mut text = String::new();
    while let Some(line) = lines.next_line().await? {
        if line == "." {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

async fn handle_line<T, R, W>(
    router: &mut Router<T>,
    lines: &mut Lines<R>,
    line: &str,
    out: &mut W,
) -> eyre::Result<Flow>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(command) = line.strip_prefix(':') else {
        if line.is_empty() {
            router.key(Key::Enter).await;
        } else {
            router.submit_line(line).await;
        }
        return Ok(Flow::Continue);
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));

    match name {
        "run" => {
            if !router.run().await && router.session().is_running() {
                writeln!(out, "[busy] previous run still in progress")?;
            }
        }
        "edit" => {
            let text = read_buffer(lines).await?;
            router.session_mut().tabs_mut().set_editor(text);
        }
        "show" => write!(out, "{}", router.session().tabs().editor())?,
        "new" => {
            let name = router.session_mut().tabs_mut().new_tab();
            writeln!(out, "[tab {name}]")?;
        }
        "open" => {
            if !router.session_mut().tabs_mut().open_tab(arg) {
                writeln!(out, "no tab named {arg:?}")?;
            }
        }
        "close" => {
            let tabs = router.session_mut().tabs_mut();
            let target = if arg.is_empty() {
                tabs.active().to_string()
            } else {
                arg.to_string()
            };
            if !tabs.close_tab(&target) {
                writeln!(out, "cannot close {target:?}")?;
            }
        }
        "tabs" => {
            let tabs = router.session().tabs();
            for name in tabs.names() {
                let marker = if name == tabs.active() { '*' } else { ' ' };
                writeln!(out, "{marker} {name}")?;
            }
        }
        "examples" => {
            for example in router.session().examples() {
                writeln!(out, "{example}")?;
            }
        }
        "load" => {
            if arg.is_empty() {
                writeln!(out, "usage: :load <file>")?;
            } else {
                router.load_example(arg).await;
            }
        }
        "prev" => {
            let recalled = router.session_mut().recall_previous();
            writeln!(out, "{recalled}")?;
        }
        "cancel" => router.session_mut().cancel_line(),
        "history" => {
            let history = router.session().command_line().history();
            for (i, entry) in history.entries().enumerate() {
                writeln!(out, "{i:>4}  {}", unescape_html(entry))?;
            }
        }
        "status" => {
            let session = router.session();
            writeln!(
                out,
                "{} | {} | {} tab(s), active {} | {} line(s) of output",
                if router.is_closed() { "disconnected" } else { "connected" },
                if session.is_running() { "running" } else { "idle" },
                session.tabs().len(),
                session.tabs().active(),
                session.output().line_breaks(),
            )?;
        }
        "help" => writeln!(out, "{HELP}")?,
        "quit" | "q" => return Ok(Flow::Quit),
        _ => writeln!(out, "unknown command :{name} (try :help)")?,
    }
    out.flush()?;
    Ok(Flow::Continue)
}

async fn repl<T: Transport>(router: &mut Router<T>) -> eyre::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    let mut connected = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle_line(router, &mut lines, &line, &mut stdout).await? {
                    break;
                }
            }
            event = router.recv(), if connected => {
                match event {
                    Some(event) => {
                        if let Some(update) = router.dispatch(event) {
                            render(&update);
                        }
                    }
                    None => {
                        connected = false;
                        println!("[disconnected] reload to reconnect");
                    }
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if args.expand_tabs {
        config.tab_expansion = TabExpansion::Expand;
    }

    if let Some(Command::Examples) = args.command {
        for example in &config.examples {
            println!("{example}");
        }
        return Ok(());
    }

    let mut session = Session::new(&config);
    for path in &args.open {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        session.tabs_mut().set_pending(tab_name(path));
        session.tabs_mut().create_tab(content);
    }

    let transport = WsTransport::connect(&config.endpoint)
        .await
        .wrap_err_with(|| format!("connecting to {}", config.endpoint))?;
    let mut router = Router::new(transport, session);

    repl(&mut router).await?;

    if let Some(path) = args.transcript {
        std::fs::write(&path, router.session().output().markup())
            .wrap_err_with(|| format!("writing transcript {}", path.display()))?;
    }

    Ok(())
}
