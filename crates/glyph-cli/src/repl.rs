//! Interactive playground on stdin/stdout.
//!
//! Every input line is typed into the editor key by key, so abbreviations
//! expand exactly as they would in the browser editor. Lines starting with
//! `:` are playground commands.

use std::time::Duration;

use rhizome_glyph_editor::{EditorWidget, Key, Keymap, TextBuffer};
use rhizome_glyph_session::{EngineHandle, PlaygroundConfig, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::terminal::TerminalLog;

/// How long to wait for outstanding replies after stdin closes.
const SETTLE_TIMEOUT: Duration = Duration::from_millis(500);

type TerminalSession = Session<TextBuffer, TerminalLog>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Eval,
    Load(&'a str),
    Run(&'a str),
    Clear,
    ClearLog,
    Show,
    Symbols,
    Quit,
    Unknown(&'a str),
}

/// Parse a `:command` line. Returns `None` for ordinary input.
pub fn parse_command(line: &str) -> Option<ReplCommand<'_>> {
    let rest = line.strip_prefix(':')?.trim();
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    Some(match (name, arg) {
        ("eval", _) => ReplCommand::Eval,
        ("load", file) if !file.is_empty() => ReplCommand::Load(file),
        ("run", file) if !file.is_empty() => ReplCommand::Run(file),
        ("clear", _) => ReplCommand::Clear,
        ("clear-log", _) => ReplCommand::ClearLog,
        ("show", _) => ReplCommand::Show,
        ("symbols", _) => ReplCommand::Symbols,
        ("quit" | "q", _) => ReplCommand::Quit,
        _ => ReplCommand::Unknown(rest),
    })
}

/// Type `text` into a fresh buffer and return the result.
pub fn expand_text(keymap: &Keymap, text: &str) -> String {
    let mut buffer = TextBuffer::new();
    keymap.type_text(&mut buffer, text);
    buffer.value()
}

/// Run the playground until `:quit` or end of input.
pub async fn run(
    config: PlaygroundConfig,
    engine: EngineHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    let keymap = config.keymap()?;
    let mut session = Session::new(TextBuffer::new(), TerminalLog::default(), keymap, engine);

    if let Some(tutorial) = config.engine.tutorial.clone() {
        load_file(&mut session, &config, &tutorial);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut engine_alive = true;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !handle_line(&mut session, &config, &line) {
                        break;
                    }
                }
                None => {
                    if engine_alive {
                        settle(&mut session).await;
                    }
                    break;
                }
            },
            alive = session.pump(), if engine_alive => {
                if !alive {
                    error!("evaluation engine stopped; restart the playground to continue");
                    engine_alive = false;
                }
            }
        }
    }

    debug!("log at exit: {} bytes", session.log().contents().len());
    Ok(())
}

/// Deliver replies until the engine goes quiet.
async fn settle(session: &mut TerminalSession) {
    while let Ok(true) = timeout(SETTLE_TIMEOUT, session.pump()).await {}
}

/// Returns false when the session should end.
fn handle_line(session: &mut TerminalSession, config: &PlaygroundConfig, line: &str) -> bool {
    let Some(command) = parse_command(line) else {
        session.type_text(line);
        session.press(Key::Enter);
        debug!("cursor at {}", session.cursor_status());
        return true;
    };

    match command {
        ReplCommand::Eval => {
            session.evaluate(|result| debug!("editor evaluation finished: {}", result));
        }
        ReplCommand::Load(file) => load_file(session, config, file),
        ReplCommand::Run(file) => match std::fs::read_to_string(config.library_path(file)) {
            Ok(contents) => {
                let name = file.to_string();
                session.evaluate_file(file, &contents, move |result| {
                    debug!("{} finished: {}", name, result)
                });
            }
            Err(err) => error!("failed to read {}: {}", file, err),
        },
        ReplCommand::Clear => session.clear_editor(),
        ReplCommand::ClearLog => session.clear_log(),
        ReplCommand::Show => {
            println!("{}", session.editor().value());
            println!("-- {}", session.cursor_status());
        }
        ReplCommand::Symbols => print_symbols(session.keymap()),
        ReplCommand::Quit => return false,
        ReplCommand::Unknown(name) => warn!("unknown command ':{}'", name),
    }
    true
}

fn load_file(session: &mut TerminalSession, config: &PlaygroundConfig, file: &str) {
    let path = config.library_path(file);
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            session.load_source(&contents);
            info!("loaded {}", path.display());
        }
        Err(err) => error!("failed to read {}: {}", path.display(), err),
    }
}

pub fn print_symbols(keymap: &Keymap) {
    for rule in keymap.symbols().iter() {
        let trailing = if rule.append_separator { " (+separator)" } else { "" };
        println!("\\{:<8} {}{}", rule.token, rule.replacement, trailing);
    }
}
