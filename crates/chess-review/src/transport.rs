//! Duplex message channel to a UCI engine.
//!
//! The engine runs concurrently and is reachable only through messages:
//! command lines go in, output lines come out. [`EngineChannel`] is the
//! controller's end. The other end is either a spawned engine process
//! ([`EngineProcess`]) or an in-process engine holding an
//! [`EngineEndpoint`].

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use uci::{GuiCommand, UciError};

/// Buffered lines per direction.
pub const CHANNEL_CAPACITY: usize = 1024;

/// Errors from the engine transport. All of them are fatal to the session.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to spawn the engine process.
    #[error("Failed to spawn engine: {0}")]
    Spawn(#[from] std::io::Error),
    /// The engine command line was empty.
    #[error("Empty engine command")]
    EmptyCommand,
    /// The engine went away (process exited or endpoint dropped).
    #[error("Engine channel closed")]
    Closed,
}

/// Controller side of the engine channel.
pub struct EngineChannel {
    commands: mpsc::Sender<String>,
    lines: mpsc::Receiver<String>,
}

/// Engine side of the channel, for engines hosted in-process.
pub struct EngineEndpoint {
    /// Command lines sent by the controller.
    pub commands: mpsc::Receiver<String>,
    /// Output lines delivered to the controller.
    pub lines: mpsc::Sender<String>,
}

impl EngineChannel {
    /// Creates a connected channel/endpoint pair.
    pub fn pair(capacity: usize) -> (Self, EngineEndpoint) {
        let (commands_tx, commands_rx) = mpsc::channel(capacity);
        let (lines_tx, lines_rx) = mpsc::channel(capacity);
        (
            Self {
                commands: commands_tx,
                lines: lines_rx,
            },
            EngineEndpoint {
                commands: commands_rx,
                lines: lines_tx,
            },
        )
    }

    /// Posts a command to the engine.
    pub async fn send(&self, command: &GuiCommand) -> Result<(), TransportError> {
        let line = command.to_uci();
        tracing::debug!(target: "engine", "> {}", line);
        self.commands
            .send(line)
            .await
            .map_err(|_| TransportError::Closed)
    }

    /// Waits for the next output line.
    pub async fn recv(&mut self) -> Result<String, TransportError> {
        self.lines.recv().await.ok_or(TransportError::Closed)
    }

    /// Returns the next output line if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<String>, TransportError> {
        match self.lines.try_recv() {
            Ok(line) => Ok(Some(line)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Closed),
        }
    }
}

impl EngineEndpoint {
    /// Waits for the next command from the controller.
    ///
    /// Returns `None` once the controller is gone.
    pub async fn next_command(&mut self) -> Option<Result<GuiCommand, UciError>> {
        let line = self.commands.recv().await?;
        Some(GuiCommand::parse(&line))
    }

    /// Sends an output line to the controller.
    pub async fn emit(&self, line: impl Into<String>) -> Result<(), TransportError> {
        self.lines
            .send(line.into())
            .await
            .map_err(|_| TransportError::Closed)
    }
}

/// A UCI engine running as a child process.
pub struct EngineProcess {
    child: Child,
    commands: mpsc::Sender<String>,
}

impl EngineProcess {
    /// Spawns the engine and bridges its stdio to a new [`EngineChannel`].
    ///
    /// `command` is split on whitespace into program and arguments.
    /// Must be called from within a tokio runtime.
    pub fn spawn(command: &str) -> Result<(Self, EngineChannel), TransportError> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let (program, args) = parts.split_first().ok_or(TransportError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("engine stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("engine stdout unavailable"))?;

        let (channel, endpoint) = EngineChannel::pair(CHANNEL_CAPACITY);
        let commands = channel.commands.clone();
        let EngineEndpoint {
            commands: mut commands_rx,
            lines: lines_tx,
        } = endpoint;

        // Task to write to stdin
        tokio::spawn(async move {
            while let Some(cmd) = commands_rx.recv().await {
                if stdin.write_all(cmd.as_bytes()).await.is_err()
                    || stdin.write_all(b"\n").await.is_err()
                    || stdin.flush().await.is_err()
                {
                    tracing::warn!("engine stdin closed");
                    break;
                }
            }
        });

        // Task to read from stdout
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::trace!(target: "engine", "< {}", line);
                if lines_tx.send(line).await.is_err() {
                    break;
                }
            }
            tracing::debug!("engine stdout closed");
        });

        tracing::info!("spawned engine: {}", command);
        Ok((Self { child, commands }, channel))
    }

    /// Asks the engine to quit, then kills it if it is still running.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(GuiCommand::Quit.to_uci()).await;

        // Give it a moment to exit
        if tokio::time::timeout(Duration::from_millis(200), self.child.wait())
            .await
            .is_err()
        {
            let _ = self.child.kill().await;
        }
    }
}
