//! Engine backed by an external interpreter process.
//!
//! The child reads one JSON request per line on stdin
//! (`{"actionName": ..., "payload": ...}`) and writes one JSON reply per
//! line on stdout (`{"kind": ..., "result": ...}`). Stderr is inherited.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, Command};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::engine::{EngineError, EngineHandle};
use crate::message::{Reply, Request};

/// Spawns interpreter processes speaking the line protocol.
pub struct ProcessEngine;

impl ProcessEngine {
    /// Start `command` (program followed by its arguments).
    ///
    /// Must be called from within a Tokio runtime. The child is killed when
    /// the returned handle is shut down or its request side is dropped.
    pub fn spawn(command: &[String]) -> Result<EngineHandle, EngineError> {
        let (program, args) = command.split_first().ok_or(EngineError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(EngineError::MissingPipe("stdout"))?;
        info!("started engine process {} (pid {:?})", program, child.id());

        let (request_tx, request_rx) = mpsc::unbounded_channel::<Request>();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel::<Reply>();

        let task = tokio::spawn(async move {
            let mut writer = tokio::spawn(write_requests(stdin, request_rx));
            let mut writing = true;
            let mut lines = BufReader::new(stdout).lines();

            loop {
                tokio::select! {
                    done = &mut writer, if writing => {
                        writing = false;
                        match done {
                            Ok(WriterExit::RequestsClosed) => break,
                            Ok(WriterExit::StdinClosed) => {}
                            Err(err) => {
                                error!("engine writer task failed: {}", err);
                                break;
                            }
                        }
                    },
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            if reply_tx.send(Reply::parse(&line)).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {
                            warn!("engine process closed its output");
                            break;
                        }
                        Err(err) => {
                            error!("failed to read engine output: {}", err);
                            break;
                        }
                    },
                }
            }

            writer.abort();
            if let Err(err) = child.kill().await {
                warn!("failed to stop engine process: {}", err);
            }
        });

        Ok(EngineHandle::new(request_tx, reply_rx, task))
    }
}

enum WriterExit {
    RequestsClosed,
    StdinClosed,
}

/// Forward requests to the child's stdin, one JSON line each.
///
/// Runs on its own task; engine output is read while a write is pending.
async fn write_requests(
    mut stdin: ChildStdin,
    mut requests: mpsc::UnboundedReceiver<Request>,
) -> WriterExit {
    while let Some(request) = requests.recv().await {
        let mut line = match request.to_json() {
            Ok(line) => line,
            Err(err) => {
                error!("failed to encode request: {}", err);
                continue;
            }
        };
        line.push('\n');
        if let Err(err) = stdin.write_all(line.as_bytes()).await {
            warn!("engine stopped accepting requests: {}", err);
            return WriterExit::StdinClosed;
        }
    }
    WriterExit::RequestsClosed
}
