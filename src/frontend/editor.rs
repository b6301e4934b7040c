//! Line editing on a raw-mode terminal.
//!
//! While a line is requested the terminal is put in raw mode and keys are
//! read with crossterm. Tab completes the command name from the current
//! completion candidates; Up and Down recall earlier command lines. The
//! line being edited is shared with the front end so alerts can be printed
//! above it without losing what the user typed.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use super::{PrefixCompleter, ReadOutcome};

/// Outcome of pressing Tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing to complete.
    None,
    /// The command word was extended.
    Inserted,
    /// Several candidates share no longer prefix; they should be listed.
    Candidates(Vec<String>),
}

/// An editable line with a cursor, both counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    /// Create an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line holding `text` with the cursor at its end.
    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    /// The line's text.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Insert a char at the cursor.
    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Delete everything before the cursor.
    pub fn kill_to_start(&mut self) {
        self.chars.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Complete the command word under the cursor.
    ///
    /// A single match is inserted with a trailing space. Several matches
    /// are extended to their longest common prefix, or returned for
    /// listing when that adds nothing.
    pub fn complete(&mut self, completer: &PrefixCompleter) -> Completion {
        let Some((start, prefix)) = self.command_word() else {
            return Completion::None;
        };

        let matches = completer.complete(&prefix);
        let replacement = match matches.as_slice() {
            [] => return Completion::None,
            [only] if self.cursor < self.chars.len() => only.clone(),
            [only] => format!("{only} "),
            _ => {
                let common = common_prefix(&matches);
                if common.chars().count() <= prefix.chars().count() {
                    return Completion::Candidates(matches);
                }
                common
            }
        };

        let inserted = replacement.chars().count();
        self.chars.splice(start..self.cursor, replacement.chars());
        self.cursor = start + inserted;
        Completion::Inserted
    }

    /// Start and text of the first word, when the cursor sits at its end.
    fn command_word(&self) -> Option<(usize, String)> {
        let start = self
            .chars
            .iter()
            .position(|c| !c.is_whitespace())
            .unwrap_or(self.chars.len());
        if start > self.cursor {
            return None;
        }

        let word = &self.chars[start..self.cursor];
        if word.iter().any(|c| c.is_whitespace()) {
            return None;
        }
        if self.chars.get(self.cursor).is_some_and(|c| !c.is_whitespace()) {
            return None;
        }
        Some((start, word.iter().collect()))
    }
}

fn common_prefix(words: &[String]) -> String {
    let Some((first, rest)) = words.split_first() else {
        return String::new();
    };
    let mut len = first.chars().count();
    for word in rest {
        len = first
            .chars()
            .zip(word.chars())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count();
    }
    first.chars().take(len).collect()
}

#[derive(Debug, Default)]
struct EditorShared {
    completer: PrefixCompleter,
    history: Vec<String>,
    prompt: String,
    /// The line being edited, while a read is in progress.
    active: Option<LineBuffer>,
}

/// State shared between the terminal front end and the line editor.
///
/// The front end feeds it completion candidates, history and the prompt;
/// the editor publishes the line being typed so that output arriving in
/// the meantime can be printed above it.
#[derive(Debug, Clone, Default)]
pub struct EditorHandle {
    inner: Arc<Mutex<EditorShared>>,
}

impl EditorHandle {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EditorShared> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the completion candidates.
    pub fn set_completer(&self, completer: &PrefixCompleter) {
        self.lock().completer = completer.clone();
    }

    /// The current completion candidates.
    pub fn completer(&self) -> PrefixCompleter {
        self.lock().completer.clone()
    }

    /// Remember a command line for recall. Repeats of the last line are
    /// kept once.
    pub fn push_history(&self, line: &str) {
        let mut shared = self.lock();
        if shared.history.last().map(String::as_str) != Some(line) {
            shared.history.push(line.to_string());
        }
    }

    /// Replace the recallable lines, oldest first.
    pub fn set_history(&self, lines: Vec<String>) {
        self.lock().history = lines;
    }

    /// Recallable lines, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Set the prompt drawn in front of the line.
    pub fn set_prompt(&self, prompt: &str) {
        self.lock().prompt = prompt.to_string();
    }

    /// Check whether a line is being edited right now.
    pub fn is_editing(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Print `text` on its own lines, then redraw the line being edited.
    ///
    /// Returns whether a line was being edited and has been redrawn.
    pub fn print_above<W: Write>(&self, out: &mut W, text: &str) -> io::Result<bool> {
        let shared = self.lock();
        queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        for line in text.split('\n') {
            queue!(out, Print(line), Print("\r\n"))?;
        }

        let redrawn = match &shared.active {
            Some(line) => {
                draw(out, &shared.prompt, line)?;
                true
            }
            None => false,
        };
        out.flush()?;
        Ok(redrawn)
    }

    fn redraw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let shared = self.lock();
        if let Some(line) = &shared.active {
            draw(out, &shared.prompt, line)?;
        }
        out.flush()
    }

    fn begin(&self) {
        self.lock().active = Some(LineBuffer::new());
    }

    fn finish(&self) {
        self.lock().active = None;
    }
}

fn draw<W: Write>(out: &mut W, prompt: &str, line: &LineBuffer) -> io::Result<()> {
    let column = prompt.chars().count() + line.cursor();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(line.text()),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX))
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyAction {
    Redraw,
    List(Vec<String>),
    Submit(String),
    Interrupt,
    Eof,
    Ignore,
}

/// Position while walking back through history.
#[derive(Debug, Default)]
struct Recall {
    index: Option<usize>,
    draft: String,
}

impl Recall {
    fn reset(&mut self) {
        self.index = None;
        self.draft.clear();
    }

    fn previous(&mut self, history: &[String], line: &mut LineBuffer) -> bool {
        let index = match self.index {
            None if history.is_empty() => return false,
            None => {
                self.draft = line.text();
                history.len() - 1
            }
            Some(0) => return false,
            Some(i) => i - 1,
        };
        self.index = Some(index);
        *line = LineBuffer::from_text(&history[index]);
        true
    }

    fn next(&mut self, history: &[String], line: &mut LineBuffer) -> bool {
        match self.index {
            None => false,
            Some(i) if i + 1 < history.len() => {
                self.index = Some(i + 1);
                *line = LineBuffer::from_text(&history[i + 1]);
                true
            }
            Some(_) => {
                self.index = None;
                *line = LineBuffer::from_text(&self.draft);
                true
            }
        }
    }
}

/// Reads one line at a time from key events.
#[derive(Debug)]
pub struct LineEditor {
    handle: EditorHandle,
    recall: Recall,
}

impl LineEditor {
    /// Create an editor working on `handle`.
    pub fn new(handle: EditorHandle) -> Self {
        Self {
            handle,
            recall: Recall::default(),
        }
    }

    /// Edit one line from `keys`, echoing to `out`.
    ///
    /// The prompt is expected to be on screen already. Enter submits the
    /// line, Ctrl-C interrupts, and Ctrl-D on an empty line or the end of
    /// `keys` reports end of input.
    pub fn read_line<K, W>(&mut self, keys: &mut K, out: &mut W) -> io::Result<ReadOutcome>
    where
        K: Iterator<Item = io::Result<KeyEvent>>,
        W: Write,
    {
        self.recall.reset();
        self.handle.begin();
        let outcome = self.edit(keys, out);
        self.handle.finish();
        outcome
    }

    fn edit<K, W>(&mut self, keys: &mut K, out: &mut W) -> io::Result<ReadOutcome>
    where
        K: Iterator<Item = io::Result<KeyEvent>>,
        W: Write,
    {
        for key in keys {
            let key = key?;
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match self.apply(key) {
                KeyAction::Redraw => self.handle.redraw(out)?,
                KeyAction::List(candidates) => {
                    self.handle.print_above(out, &candidates.join("  "))?;
                }
                KeyAction::Submit(line) => {
                    finish_line(out, "")?;
                    return Ok(ReadOutcome::Line(line));
                }
                KeyAction::Interrupt => {
                    finish_line(out, "^C")?;
                    return Ok(ReadOutcome::Interrupted);
                }
                KeyAction::Eof => {
                    finish_line(out, "")?;
                    return Ok(ReadOutcome::Eof);
                }
                KeyAction::Ignore => {}
            }
        }
        Ok(ReadOutcome::Eof)
    }

    fn apply(&mut self, key: KeyEvent) -> KeyAction {
        let mut shared = self.handle.lock();
        let EditorShared {
            completer,
            history,
            active,
            ..
        } = &mut *shared;
        let Some(line) = active.as_mut() else {
            return KeyAction::Ignore;
        };

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let changed = match key.code {
            KeyCode::Char('c') if ctrl => return KeyAction::Interrupt,
            KeyCode::Char('d') if ctrl && line.is_empty() => return KeyAction::Eof,
            KeyCode::Char('d') if ctrl => line.delete(),
            KeyCode::Char('a') if ctrl => {
                line.home();
                true
            }
            KeyCode::Char('e') if ctrl => {
                line.end();
                true
            }
            KeyCode::Char('u') if ctrl => {
                line.kill_to_start();
                true
            }
            KeyCode::Char(_) if ctrl => false,
            KeyCode::Char(c) => {
                line.insert(c);
                true
            }
            KeyCode::Enter => return KeyAction::Submit(line.text()),
            KeyCode::Backspace => line.backspace(),
            KeyCode::Delete => line.delete(),
            KeyCode::Left => line.move_left(),
            KeyCode::Right => line.move_right(),
            KeyCode::Home => {
                line.home();
                true
            }
            KeyCode::End => {
                line.end();
                true
            }
            KeyCode::Up => self.recall.previous(history, line),
            KeyCode::Down => self.recall.next(history, line),
            KeyCode::Tab => match line.complete(completer) {
                Completion::Inserted => true,
                Completion::Candidates(candidates) => return KeyAction::List(candidates),
                Completion::None => false,
            },
            _ => false,
        };

        if changed {
            KeyAction::Redraw
        } else {
            KeyAction::Ignore
        }
    }
}

fn finish_line<W: Write>(out: &mut W, marker: &str) -> io::Result<()> {
    queue!(out, Print(marker), Print("\r\n"))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> io::Result<KeyEvent> {
        Ok(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> io::Result<KeyEvent> {
        Ok(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn typed(text: &str) -> Vec<io::Result<KeyEvent>> {
        text.chars().map(|c| press(KeyCode::Char(c))).collect()
    }

    fn read(handle: &EditorHandle, keys: Vec<io::Result<KeyEvent>>) -> ReadOutcome {
        let mut editor = LineEditor::new(handle.clone());
        let mut out = Vec::new();
        editor.read_line(&mut keys.into_iter(), &mut out).unwrap()
    }

    fn commands() -> PrefixCompleter {
        PrefixCompleter::new(["disable", "enable", "exit", "help", "modules"])
    }

    #[test]
    fn test_buffer_editing() {
        let mut line = LineBuffer::from_text("enble");
        line.move_left();
        line.move_left();
        line.move_left();
        line.insert('a');
        assert_eq!(line.text(), "enable");
        assert_eq!(line.cursor(), 3);

        line.end();
        assert!(line.backspace());
        assert_eq!(line.text(), "enabl");

        line.home();
        assert!(!line.backspace());
        assert!(line.delete());
        assert_eq!(line.text(), "nabl");
    }

    #[test]
    fn test_kill_to_start() {
        let mut line = LineBuffer::from_text("disable timer");
        for _ in 0..5 {
            line.move_left();
        }
        line.kill_to_start();
        assert_eq!(line.text(), "timer");
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn test_complete_single_match() {
        let mut line = LineBuffer::from_text("mod");
        assert_eq!(line.complete(&commands()), Completion::Inserted);
        assert_eq!(line.text(), "modules ");
        assert_eq!(line.cursor(), 8);
    }

    #[test]
    fn test_complete_common_prefix() {
        let completer = PrefixCompleter::new(["reset", "restart"]);
        let mut line = LineBuffer::from_text("r");
        assert_eq!(line.complete(&completer), Completion::Inserted);
        assert_eq!(line.text(), "res");
    }

    #[test]
    fn test_complete_lists_ambiguous() {
        let mut line = LineBuffer::from_text("e");
        assert_eq!(
            line.complete(&commands()),
            Completion::Candidates(vec!["enable".into(), "exit".into()])
        );
        assert_eq!(line.text(), "e");
    }

    #[test]
    fn test_complete_only_command_word() {
        let mut line = LineBuffer::from_text("enable mod");
        assert_eq!(line.complete(&commands()), Completion::None);

        let mut line = LineBuffer::from_text("exi");
        line.home();
        assert_eq!(line.complete(&commands()), Completion::None);

        let mut line = LineBuffer::from_text("xyz");
        assert_eq!(line.complete(&commands()), Completion::None);
    }

    #[test]
    fn test_complete_before_arguments() {
        let mut line = LineBuffer::from_text("dis timer");
        for _ in 0.." timer".len() {
            line.move_left();
        }
        assert_eq!(line.complete(&commands()), Completion::Inserted);
        assert_eq!(line.text(), "disable timer");
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix(&["reset".into(), "restart".into()]), "res");
        assert_eq!(common_prefix(&["a".into(), "b".into()]), "");
        assert_eq!(common_prefix(&[]), "");
    }

    #[test]
    fn test_read_line_with_tab() {
        let handle = EditorHandle::new();
        handle.set_completer(&commands());

        let mut keys = typed("mod");
        keys.push(press(KeyCode::Tab));
        keys.push(press(KeyCode::Enter));

        assert_eq!(read(&handle, keys), ReadOutcome::Line("modules ".into()));
        assert!(!handle.is_editing());
    }

    #[test]
    fn test_read_line_lists_candidates() {
        let handle = EditorHandle::new();
        handle.set_completer(&commands());
        handle.set_prompt("> ");

        let mut editor = LineEditor::new(handle.clone());
        let mut out = Vec::new();
        let mut keys = vec![press(KeyCode::Char('e')), press(KeyCode::Tab), press(KeyCode::Enter)]
            .into_iter();
        let outcome = editor.read_line(&mut keys, &mut out).unwrap();

        assert_eq!(outcome, ReadOutcome::Line("e".into()));
        let echoed = String::from_utf8_lossy(&out);
        assert!(echoed.contains("enable  exit\r\n"));
    }

    #[test]
    fn test_history_recall() {
        let handle = EditorHandle::new();
        handle.push_history("modules");
        handle.push_history("disable timer");

        let keys = vec![press(KeyCode::Up), press(KeyCode::Enter)];
        assert_eq!(read(&handle, keys), ReadOutcome::Line("disable timer".into()));

        let keys = vec![
            press(KeyCode::Up),
            press(KeyCode::Up),
            press(KeyCode::Up),
            press(KeyCode::Enter),
        ];
        assert_eq!(read(&handle, keys), ReadOutcome::Line("modules".into()));
    }

    #[test]
    fn test_history_down_restores_draft() {
        let handle = EditorHandle::new();
        handle.push_history("modules");

        let mut keys = typed("he");
        keys.push(press(KeyCode::Up));
        keys.push(press(KeyCode::Down));
        keys.push(press(KeyCode::Char('l')));
        keys.push(press(KeyCode::Char('p')));
        keys.push(press(KeyCode::Enter));

        assert_eq!(read(&handle, keys), ReadOutcome::Line("help".into()));
    }

    #[test]
    fn test_push_history_skips_repeats() {
        let handle = EditorHandle::new();
        handle.push_history("time");
        handle.push_history("time");
        handle.push_history("reset");
        assert_eq!(handle.history(), vec!["time", "reset"]);
    }

    #[test]
    fn test_ctrl_keys() {
        let handle = EditorHandle::new();
        assert_eq!(read(&handle, vec![ctrl('c')]), ReadOutcome::Interrupted);
        assert_eq!(read(&handle, vec![ctrl('d')]), ReadOutcome::Eof);

        let mut keys = typed("xhelp");
        keys.push(ctrl('a'));
        keys.push(ctrl('d'));
        keys.push(press(KeyCode::Enter));
        assert_eq!(read(&handle, keys), ReadOutcome::Line("help".into()));
    }

    #[test]
    fn test_end_of_keys_is_eof() {
        let handle = EditorHandle::new();
        assert_eq!(read(&handle, typed("hel")), ReadOutcome::Eof);
    }

    #[test]
    fn test_print_above_redraws_line() {
        let handle = EditorHandle::new();
        handle.set_prompt("> ");

        let mut out = Vec::new();
        assert!(!handle.print_above(&mut out, "idle").unwrap());

        handle.begin();
        if let Some(line) = handle.lock().active.as_mut() {
            line.insert('t');
        }
        let mut out = Vec::new();
        assert!(handle.print_above(&mut out, "Timer fired").unwrap());
        handle.finish();

        let echoed = String::from_utf8_lossy(&out);
        let alert = echoed.find("Timer fired\r\n").unwrap();
        let redraw = echoed.rfind("> t").unwrap();
        assert!(alert < redraw);
    }
}
