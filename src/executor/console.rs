use std::collections::HashMap;

use super::context::Session;
use super::handlers;
use crate::error::{Error, Result};
use crate::input::Line;
use crate::prompt::Prompter;

/// What the read loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type Handler = fn(&mut Console, &[String]) -> Result<Flow>;

/// Read-dispatch loop over the registered console commands.
pub struct Console {
    session: Session,
    prompter: Prompter,
    handlers: HashMap<&'static str, Handler>,
}

impl Console {
    /// A console with the built-in commands registered.
    pub fn new(session: Session, prompter: Prompter) -> Self {
        let mut console = Console {
            session,
            prompter,
            handlers: HashMap::new(),
        };
        console.register(&["ls", "list"], handlers::list);
        console.register(&["edit"], handlers::edit);
        console.register(&["guild", "context", "ctx"], handlers::guild);
        console.register(&["del", "delete", "rm"], handlers::delete);
        console.register(&["create", "make", "new"], handlers::create);
        console.register(&["exit", "bye"], handlers::exit);
        console.register(&["help"], handlers::help);
        console
    }

    /// Registers a handler under every name in `names`, replacing earlier ones.
    pub fn register(&mut self, names: &[&'static str], handler: Handler) {
        for &name in names {
            self.handlers.insert(name, handler);
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(super) fn parts(&mut self) -> (&mut Session, &mut Prompter) {
        (&mut self.session, &mut self.prompter)
    }

    /// Runs one input line. Blank lines do nothing.
    pub fn dispatch(&mut self, line: &str) -> Result<Flow> {
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };
        let handler = *self
            .handlers
            .get(name.as_str())
            .ok_or_else(|| Error::UnknownCommand(name.clone()))?;
        handler(self, args)
    }

    /// Reads and dispatches lines until `exit`, or an interrupt at the prompt.
    ///
    /// Failures inside a command are printed and the loop carries on.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let prompt = self.session.prompt();
            let line = match self.prompter.read_line(&prompt)? {
                Line::Text(line) => line,
                Line::Interrupted | Line::Eof => {
                    println!();
                    return Ok(());
                }
            };

            let result = self.dispatch(&line);
            self.prompter.clear_interrupt();
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(Error::Interrupted) | Err(Error::EndOfInput) => println!(),
                Err(e @ Error::UnknownCommand(_)) => println!("{e}"),
                Err(Error::Usage(usage)) => print!("{usage}"),
                Err(e) => {
                    log::debug!("command '{line}' failed: {e:?}");
                    println!("ERROR: {e}");
                    println!("Type 'exit' to exit the program");
                }
            }
        }
    }
}
