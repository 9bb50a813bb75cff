use std::io::{self, Stdout, Write};

use crate::models::MonitorEvent;

/// Writes the human-readable event stream, one line per event
pub struct EventPrinter<W: Write> {
    out: W,
}

impl EventPrinter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn print_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    pub fn print_all(&mut self, events: &[MonitorEvent]) -> io::Result<()> {
        for event in events {
            writeln!(self.out, "{}", event)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
