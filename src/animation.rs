//! Play/pause driver that advances the year on a fixed cadence.
//!
//! The driver does not own a timer thread. The host polls it (once per frame
//! in the GUI) and applies one year step per tick that came due, all in a
//! single redraw. Time comes from an injected [`Clock`] so tests can step a
//! [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Default tick period.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(500);

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-stepped clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
}

impl PlayState {
    /// Caption for the play/pause control.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Idle => "Play",
            Self::Playing => "Pause",
        }
    }
}

#[derive(Debug)]
pub struct AnimationDriver<C: Clock = SystemClock> {
    clock: C,
    period: Duration,
    next_tick: Option<Duration>,
    fired: u64,
}

impl Default for AnimationDriver<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::default(), DEFAULT_PERIOD)
    }
}

impl<C: Clock> AnimationDriver<C> {
    pub fn new(clock: C, period: Duration) -> Self {
        Self {
            clock,
            period: period.max(Duration::from_millis(1)),
            next_tick: None,
            fired: 0,
        }
    }

    pub fn state(&self) -> PlayState {
        if self.next_tick.is_some() {
            PlayState::Playing
        } else {
            PlayState::Idle
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks delivered since construction.
    pub fn ticks_fired(&self) -> u64 {
        self.fired
    }

    /// Play-button activation: flips between `Idle` and `Playing`.
    pub fn toggle(&mut self) -> PlayState {
        match self.state() {
            PlayState::Idle => self.start(),
            PlayState::Playing => self.stop(),
        }
        self.state()
    }

    /// Schedule the first tick one period from now. No-op when already playing.
    pub fn start(&mut self) {
        if self.next_tick.is_none() {
            self.next_tick = Some(self.clock.now() + self.period);
            log::debug!("animation started, period {:?}", self.period);
        }
    }

    /// Cancel the schedule; no tick is delivered afterwards.
    pub fn stop(&mut self) {
        if self.next_tick.take().is_some() {
            log::debug!("animation stopped after {} tick(s)", self.fired);
        }
    }

    /// Number of ticks that came due since the last poll. Always 0 while idle.
    /// After a long stall the next tick is one period after the last one due,
    /// so the backlog is reported once instead of replayed.
    pub fn poll(&mut self) -> u32 {
        let Some(due) = self.next_tick else {
            return 0;
        };
        let now = self.clock.now();
        if due > now {
            return 0;
        }
        let late = (now - due).as_nanos() / self.period.as_nanos();
        let n = u32::try_from(late.saturating_add(1)).unwrap_or(u32::MAX);
        self.next_tick = Some(due + self.period * n);
        self.fired += u64::from(n);
        n
    }

    /// How long until the next tick, for scheduling a repaint.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.next_tick
            .map(|due| due.saturating_sub(self.clock.now()))
    }
}
