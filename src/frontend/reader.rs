//! Async line input.
//!
//! Reading from a terminal blocks, so lines are read on a dedicated thread
//! and handed to the session through a channel. The session awaits the next
//! line while also listening for Ctrl-C.
//!
//! On an interactive terminal the thread runs a [`LineEditor`] instead, and
//! only reads when the session asks for a line, so the terminal is in raw
//! mode exactly while the user is typing.

use std::io::{self, BufRead, BufReader, Write};
use std::sync::mpsc as std_mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::{EditorHandle, LineEditor};
use crate::error::ShellError;
use crate::Result;

/// Number of lines buffered between the reader thread and the session.
const LINE_BUFFER: usize = 64;

/// Result of waiting for one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line of text, without its terminator.
    Line(String),
    /// The input ended.
    Eof,
    /// The user pressed Ctrl-C.
    Interrupted,
}

/// Source of input lines for a session.
pub struct LineReader {
    rx: mpsc::Receiver<ReadOutcome>,
    demand: Option<std_mpsc::Sender<()>>,
    pending: bool,
    watch_interrupt: bool,
}

impl LineReader {
    fn with_receiver(rx: mpsc::Receiver<ReadOutcome>) -> Self {
        Self {
            rx,
            demand: None,
            pending: false,
            watch_interrupt: false,
        }
    }

    /// Read lines from `reader` on a background thread.
    ///
    /// The thread stops at end of input, on a read error, or when the
    /// `LineReader` is dropped and the next line cannot be delivered.
    pub fn spawn<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);

        let spawned = thread::Builder::new()
            .name("modshell-input".into())
            .spawn(move || read_lines(reader, tx));
        if let Err(e) = spawned {
            // The sender went down with the closure, so the reader sees EOF
            error!("failed to spawn input thread: {}", e);
        }

        Self::with_receiver(rx)
    }

    /// Read lines from standard input, treating Ctrl-C as end of input.
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(io::stdin())).with_interrupt(true)
    }

    /// Edit lines on the terminal with completion and history recall.
    ///
    /// `editor` must be the handle of the front end that renders the
    /// session, so the editor sees its prompt, candidates and history.
    pub fn terminal(editor: EditorHandle) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let (demand_tx, demand_rx) = std_mpsc::channel();

        let spawned = thread::Builder::new()
            .name("modshell-editor".into())
            .spawn(move || edit_lines(editor, demand_rx, tx));
        if let Err(e) = spawned {
            error!("failed to spawn editor thread: {}", e);
        }

        Self {
            demand: Some(demand_tx),
            ..Self::with_receiver(rx)
        }
    }

    /// Serve a fixed list of lines, then report end of input.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let (tx, rx) = mpsc::channel(lines.len().max(1));
        for line in lines {
            // Capacity matches the line count, so this cannot fail
            let _ = tx.try_send(ReadOutcome::Line(line));
        }

        Self::with_receiver(rx)
    }

    /// Create a reader fed from async code.
    ///
    /// Input ends once every [`LineFeed`] is dropped.
    pub fn channel(buffer: usize) -> (LineFeed, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (LineFeed { tx }, Self::with_receiver(rx))
    }

    /// Set whether Ctrl-C ends the wait for input.
    pub fn with_interrupt(mut self, watch: bool) -> Self {
        self.watch_interrupt = watch;
        self
    }

    /// Wait for the next line.
    ///
    /// Cancel safe: a line requested from the editor by a cancelled call
    /// is delivered to the next one.
    pub async fn next_line(&mut self) -> ReadOutcome {
        self.request_line();
        let outcome = self.receive().await;
        self.pending = false;
        outcome
    }

    fn request_line(&mut self) {
        if self.pending {
            return;
        }
        if let Some(demand) = &self.demand {
            // A dead editor thread dropped its sender, so receive sees EOF
            let _ = demand.send(());
        }
        self.pending = true;
    }

    async fn receive(&mut self) -> ReadOutcome {
        if !self.watch_interrupt {
            return into_outcome(self.rx.recv().await);
        }

        let signal = tokio::select! {
            outcome = self.rx.recv() => return into_outcome(outcome),
            signal = tokio::signal::ctrl_c() => signal,
        };

        match signal {
            Ok(()) => {
                debug!("interrupt received");
                ReadOutcome::Interrupted
            }
            Err(e) => {
                warn!("cannot listen for interrupts: {}", e);
                self.watch_interrupt = false;
                into_outcome(self.rx.recv().await)
            }
        }
    }
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("editing", &self.demand.is_some())
            .field("pending", &self.pending)
            .field("watch_interrupt", &self.watch_interrupt)
            .finish()
    }
}

/// Sends lines to a [`LineReader`] created with [`LineReader::channel`].
#[derive(Debug, Clone)]
pub struct LineFeed {
    tx: mpsc::Sender<ReadOutcome>,
}

impl LineFeed {
    /// Deliver one line, waiting while the buffer is full.
    pub async fn send(&self, line: impl Into<String>) -> Result<()> {
        self.deliver(ReadOutcome::Line(line.into())).await
    }

    /// Deliver an interrupt, as if the user pressed Ctrl-C.
    pub async fn interrupt(&self) -> Result<()> {
        self.deliver(ReadOutcome::Interrupted).await
    }

    async fn deliver(&self, outcome: ReadOutcome) -> Result<()> {
        self.tx
            .send(outcome)
            .await
            .map_err(|_| ShellError::ChannelClosed("input"))
    }
}

fn into_outcome(outcome: Option<ReadOutcome>) -> ReadOutcome {
    outcome.unwrap_or(ReadOutcome::Eof)
}

fn read_lines<R: BufRead>(reader: R, tx: mpsc::Sender<ReadOutcome>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if tx.blocking_send(ReadOutcome::Line(line)).is_err() {
                    debug!("input reader: channel closed");
                    return;
                }
            }
            Err(e) => {
                error!("input reader error: {}", e);
                return;
            }
        }
    }
    debug!("input reader: EOF");
}

/// Keeps the terminal in raw mode while alive.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to leave raw mode: {}", e);
        }
    }
}

fn terminal_keys() -> impl Iterator<Item = io::Result<KeyEvent>> {
    std::iter::from_fn(|| loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(Ok(key)),
            Ok(_) => continue,
            Err(e) => return Some(Err(e)),
        }
    })
}

fn edit_lines(
    handle: EditorHandle,
    demand: std_mpsc::Receiver<()>,
    tx: mpsc::Sender<ReadOutcome>,
) {
    let mut editor = LineEditor::new(handle);
    let mut keys = terminal_keys();
    let mut stdout = io::stdout();

    while demand.recv().is_ok() {
        let outcome = match RawMode::enable() {
            Ok(_raw) => editor.read_line(&mut keys, &mut stdout),
            Err(e) => Err(e),
        };
        let _ = stdout.flush();

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("line editor failed: {}", e);
                return;
            }
        };

        let finished = outcome == ReadOutcome::Eof;
        if tx.blocking_send(outcome).is_err() || finished {
            debug!("line editor stopped");
            return;
        }
    }
    debug!("line editor: session gone");
}
