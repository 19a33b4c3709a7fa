use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufReader, Cursor, Read};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use serde_json::Value;

use crate::client::{Method, Response, Transport};
use crate::error::{Error, Result};
use crate::input::{Line, LineReader};

/// Feeds queued lines to prompts and remembers every prompt shown.
///
/// Clones share state, so a test can keep one handle after boxing another.
#[derive(Clone, Default)]
pub struct ScriptedReader {
    lines: Rc<RefCell<VecDeque<Line>>>,
    prompts: Rc<RefCell<Vec<String>>>,
    echoes: Rc<RefCell<Vec<bool>>>,
}

impl ScriptedReader {
    pub fn new(lines: &[&str]) -> Self {
        Self::from_lines(lines.iter().map(|l| Line::Text(l.to_string())).collect())
    }

    pub fn from_lines(lines: Vec<Line>) -> Self {
        ScriptedReader {
            lines: Rc::new(RefCell::new(lines.into())),
            prompts: Rc::default(),
            echoes: Rc::default(),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    /// Whether each prompt asked for its input to be echoed.
    pub fn echoes(&self) -> Vec<bool> {
        self.echoes.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.lines.borrow().len()
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, prompt: &str, echo: bool) -> io::Result<Line> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.echoes.borrow_mut().push(echo);
        Ok(self.lines.borrow_mut().pop_front().unwrap_or(Line::Eof))
    }
}

/// Byte input fed from another thread; reads block until a chunk arrives
/// and hit end of stream once every sender is gone.
pub struct FedInput {
    chunks: Receiver<Vec<u8>>,
    current: Cursor<Vec<u8>>,
}

impl FedInput {
    pub fn new() -> (BufReader<FedInput>, Sender<Vec<u8>>) {
        let (tx, rx) = mpsc::channel();
        let input = FedInput {
            chunks: rx,
            current: Cursor::new(Vec::new()),
        };
        (BufReader::new(input), tx)
    }
}

impl Read for FedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let read = self.current.read(buf)?;
            if read > 0 || buf.is_empty() {
                return Ok(read);
            }
            match self.chunks.recv() {
                Ok(chunk) => self.current = Cursor::new(chunk),
                Err(_) => return Ok(0),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

/// Answers requests from canned responses keyed by method and URL.
///
/// Responses for the same key are served in order; the last one repeats.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Rc<RefCell<HashMap<(Method, String), VecDeque<Response>>>>,
    requests: Rc<RefCell<Vec<Request>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(Response {
                status,
                body: body.to_string(),
            });
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response> {
        self.requests.borrow_mut().push(Request {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        let mut responses = self.responses.borrow_mut();
        let queue = responses
            .get_mut(&(method, url.to_string()))
            .ok_or_else(|| Error::Transport(format!("no response for {method} {url}")))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::Transport(format!("no response for {method} {url}")))
    }
}
