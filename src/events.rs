use crossterm::event::{self, Event as CEvent, KeyEvent};
use std::{sync::mpsc, thread, time::Duration};

pub(crate) enum Event<I> {
    Input(I),
    Tick,
}

const TICK_RATE: Duration = Duration::from_millis(250);

/// A small event handler that wraps crossterm input and tick events. Each
/// event type runs in its own thread and lands on a common `Receiver`, so
/// the main loop blocks on a single channel.
pub(crate) struct Events {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
}

impl Events {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            _input_handle: {
                let tx = tx.clone();
                thread::spawn(move || {
                    loop {
                        if let Ok(CEvent::Key(key)) = event::read() {
                            if tx.send(Event::Input(key)).is_err() {
                                return;
                            }
                        }
                    }
                })
            },
            _tick_handle: {
                thread::spawn(move || loop {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    thread::sleep(TICK_RATE);
                })
            },
        }
    }

    pub(crate) fn next(&self) -> Result<Event<KeyEvent>, mpsc::RecvError> {
        self.rx.recv()
    }
}
