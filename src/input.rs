use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One read from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    Interrupted,
    Eof,
}

pub trait LineReader {
    /// Shows `prompt` and blocks until a line is entered.
    fn read_line(&mut self, prompt: &str, echo: bool) -> io::Result<Line>;
}

/// Set when SIGINT arrives outside a raw-mode read; consumed by the next read.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes the process' SIGINT into a new flag.
    pub fn install() -> Result<Self, ctrlc::Error> {
        let flag = Self::new();
        let handler = flag.clone();
        ctrlc::set_handler(move || handler.raise())?;
        Ok(flag)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether the flag was set, clearing it.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Picks the terminal reader when stdin is a TTY.
pub fn default_reader(interrupt: InterruptFlag) -> Box<dyn LineReader> {
    if io::stdin().is_terminal() {
        Box::new(TerminalReader)
    } else {
        Box::new(StdinReader::new(BufReader::new(io::stdin()), interrupt))
    }
}

pub struct TerminalReader;

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str, echo: bool) -> io::Result<Line> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        enable_raw_mode()?;
        let line = read_raw(&mut stdout, echo, event::read);
        disable_raw_mode()?;

        if matches!(line, Ok(Line::Text(_))) {
            writeln!(stdout)?;
        }
        line
    }
}

/// Line editing over a stream of terminal events.
fn read_raw(
    out: &mut impl Write,
    echo: bool,
    mut next_event: impl FnMut() -> io::Result<Event>,
) -> io::Result<Line> {
    let mut buffer = String::new();
    loop {
        let Event::Key(key) = next_event()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Ok(Line::Interrupted),
            KeyCode::Char('d') if ctrl && buffer.is_empty() => return Ok(Line::Eof),
            KeyCode::Enter => return Ok(Line::Text(buffer)),
            KeyCode::Backspace => {
                if buffer.pop().is_some() && echo {
                    write!(out, "\x08 \x08")?;
                    out.flush()?;
                }
            }
            KeyCode::Char(ch) if !ctrl => {
                buffer.push(ch);
                if echo {
                    write!(out, "{ch}")?;
                    out.flush()?;
                }
            }
            _ => {}
        }
    }
}

/// Reads from a non-interactive input, one line per prompt.
///
/// Lines are pulled on a background thread so a pending read can still
/// return [`Line::Interrupted`] when the interrupt flag is raised.
pub struct StdinReader {
    lines: Receiver<io::Result<String>>,
    interrupt: InterruptFlag,
}

impl StdinReader {
    pub fn new(input: impl BufRead + Send + 'static, interrupt: InterruptFlag) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in input.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });
        StdinReader {
            lines: rx,
            interrupt,
        }
    }
}

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &str, _echo: bool) -> io::Result<Line> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        loop {
            if self.interrupt.take() {
                return Ok(Line::Interrupted);
            }
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return line.map(Line::Text),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(Line::Eof),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FedInput;
    use crossterm::event::KeyEvent;
    use std::collections::VecDeque;
    use std::io::Cursor;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    fn typed(text: &str) -> Vec<Event> {
        text.chars().map(|ch| key(KeyCode::Char(ch))).collect()
    }

    fn run(events: Vec<Event>, echo: bool) -> (Line, String) {
        let mut events = VecDeque::from(events);
        let mut out = Vec::new();
        let line = read_raw(&mut out, echo, || {
            events
                .pop_front()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
        })
        .unwrap();
        (line, String::from_utf8(out).unwrap())
    }

    #[test]
    fn backspace_removes_the_last_character() {
        let mut events = typed("nax");
        events.push(key(KeyCode::Backspace));
        events.push(key(KeyCode::Backspace));
        events.extend(typed("me"));
        events.push(key(KeyCode::Enter));

        let (line, out) = run(events, true);
        assert_eq!(line, Line::Text("name".into()));
        assert_eq!(out, "nax\x08 \x08\x08 \x08me");
    }

    #[test]
    fn backspace_on_an_empty_line_writes_nothing() {
        let (line, out) = run(vec![key(KeyCode::Backspace), key(KeyCode::Enter)], true);
        assert_eq!(line, Line::Text(String::new()));
        assert!(out.is_empty());
    }

    #[test]
    fn hidden_input_is_never_written() {
        let mut events = typed("s3cret!");
        events.push(key(KeyCode::Backspace));
        events.push(key(KeyCode::Enter));

        let (line, out) = run(events, false);
        assert_eq!(line, Line::Text("s3cret".into()));
        assert!(out.is_empty());
    }

    #[test]
    fn ctrl_c_interrupts_mid_line() {
        let mut events = typed("half");
        events.push(ctrl('c'));
        events.extend(typed("ignored"));

        let (line, _) = run(events, true);
        assert_eq!(line, Line::Interrupted);
    }

    #[test]
    fn ctrl_d_ends_input_only_on_an_empty_line() {
        let (line, _) = run(vec![ctrl('d')], true);
        assert_eq!(line, Line::Eof);

        let mut events = typed("ab");
        events.push(ctrl('d'));
        events.push(key(KeyCode::Enter));
        let (line, out) = run(events, true);
        assert_eq!(line, Line::Text("ab".into()));
        assert_eq!(out, "ab");
    }

    #[test]
    fn key_releases_and_other_events_are_skipped() {
        let release = Event::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)
        });
        let events = vec![
            Event::FocusGained,
            release,
            key(KeyCode::Char('y')),
            key(KeyCode::Enter),
        ];
        let (line, _) = run(events, true);
        assert_eq!(line, Line::Text("y".into()));
    }

    #[test]
    fn piped_lines_are_read_until_end_of_stream() {
        let input = Cursor::new(b"first\r\nsecond\n".to_vec());
        let mut reader = StdinReader::new(input, InterruptFlag::new());
        assert_eq!(reader.read_line("> ", true).unwrap(), Line::Text("first".into()));
        assert_eq!(reader.read_line("> ", true).unwrap(), Line::Text("second".into()));
        assert_eq!(reader.read_line("> ", true).unwrap(), Line::Eof);
    }

    #[test]
    fn raised_flag_interrupts_a_pending_read() {
        let (input, _feed) = FedInput::new();
        let interrupt = InterruptFlag::new();
        let mut reader = StdinReader::new(input, interrupt.clone());

        let raiser = interrupt.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            raiser.raise();
        });

        assert_eq!(reader.read_line("> ", true).unwrap(), Line::Interrupted);
        handle.join().unwrap();
        assert!(!interrupt.take());
    }
}
