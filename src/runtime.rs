use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::warn;

/// What the event loop reacts to. Time-bearing events carry the instant
/// they happened at, so the countdown never reads the clock itself.
#[derive(Clone, Debug)]
pub enum TypingEvent {
    Key(KeyEvent, Instant),
    Resize,
    Tick(Instant),
    /// The event stream ended; nothing more will arrive.
    Closed,
}

/// Spawns the terminal reader thread and returns its end of the channel.
pub fn terminal_events() -> Receiver<TypingEvent> {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || loop {
        let forwarded = match event::read() {
            Ok(CtEvent::Key(key)) => tx.send(TypingEvent::Key(key, Instant::now())),
            Ok(CtEvent::Resize(_, _)) => tx.send(TypingEvent::Resize),
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(%err, "terminal reader stopped");
                break;
            }
        };
        if forwarded.is_err() {
            break;
        }
    });

    rx
}

/// Pulls one event at a time, turning quiet periods into clock ticks.
pub struct Runner {
    events: Receiver<TypingEvent>,
    tick_rate: Duration,
    clock: Box<dyn Fn() -> Instant>,
}

impl Runner {
    pub fn new(events: Receiver<TypingEvent>, tick_rate: Duration) -> Self {
        Self::with_clock(events, tick_rate, Instant::now)
    }

    /// Ticks are stamped by `clock` instead of the wall clock.
    pub fn with_clock(
        events: Receiver<TypingEvent>,
        tick_rate: Duration,
        clock: impl Fn() -> Instant + 'static,
    ) -> Self {
        Self {
            events,
            tick_rate,
            clock: Box::new(clock),
        }
    }

    /// Waits up to one tick for an event; a timeout becomes `Tick(now)`.
    pub fn step(&self) -> TypingEvent {
        match self.events.recv_timeout(self.tick_rate) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => TypingEvent::Tick((self.clock)()),
            Err(RecvTimeoutError::Disconnected) => TypingEvent::Closed,
        }
    }
}

/// Countdown timer handle of one session.
///
/// Polled from the event loop; it only reports how many whole seconds went
/// by. Dropping it is the cancellation: a restarted game gets a new handle
/// and nothing scheduled by the old one can reach it.
#[derive(Debug)]
pub struct Countdown {
    interval: Duration,
    next_due: Instant,
}

impl Countdown {
    pub fn start(now: Instant) -> Self {
        Self::with_interval(now, Duration::from_secs(1))
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Number of whole intervals that elapsed since the previous poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_due {
            fired += 1;
            self.next_due += self.interval;
        }
        fired
    }
}
