use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::io::Lines;
use tokio::io::Stdin;
use tokio::sync::mpsc;

use crate::domain::models::Event;

pub struct EventsService {
    input: Option<Lines<BufReader<Stdin>>>,
    events: mpsc::UnboundedReceiver<Event>,
    events_closed: bool,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            input: Some(BufReader::new(tokio::io::stdin()).lines()),
            events,
            events_closed: false,
        };
    }

    /// Waits for the next reply from a worker or line from the terminal,
    /// whichever comes first. After stdin closes only worker events arrive.
    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let next = match self.input.as_mut() {
                Some(input) => {
                    tokio::select! {
                        event = self.events.recv(), if !self.events_closed => Next::Worker(event),
                        line = input.next_line() => Next::Terminal(line),
                    }
                }
                None => Next::Worker(self.events.recv().await),
            };

            match next {
                Next::Worker(Some(event)) => return Ok(event),
                Next::Worker(None) => {
                    if self.input.is_none() {
                        anyhow::bail!("Event channel closed");
                    }
                    self.events_closed = true;
                }
                Next::Terminal(Ok(Some(line))) => return Ok(Event::UserInput(line)),
                Next::Terminal(Ok(None)) => {
                    self.input = None;
                    return Ok(Event::InputClosed);
                }
                Next::Terminal(Err(err)) => {
                    tracing::warn!("failed to read from stdin: {err}");
                    self.input = None;
                    return Ok(Event::InputClosed);
                }
            }
        }
    }
}

enum Next {
    Worker(Option<Event>),
    Terminal(std::io::Result<Option<String>>),
}
