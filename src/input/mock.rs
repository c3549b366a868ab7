//! Scripted in-memory backend for unit tests.

use super::{InputBackend, RawEvent};
use crate::app::Clock;
use crate::force_feedback::RumbleEffect;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Recorded {
    closes: u32,
    plays: u32,
    reads: u32,
    rumble_updates: Vec<(i16, RumbleEffect)>,
}

/// Call log shared between a test and the backend it handed to a session.
#[derive(Clone, Default)]
pub struct MockCalls(Rc<RefCell<Recorded>>);

impl MockCalls {
    pub fn closes(&self) -> u32 {
        self.0.borrow().closes
    }

    pub fn plays(&self) -> u32 {
        self.0.borrow().plays
    }

    pub fn reads(&self) -> u32 {
        self.0.borrow().reads
    }

    pub fn rumble_updates(&self) -> Vec<(i16, RumbleEffect)> {
        self.0.borrow().rumble_updates.clone()
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

enum Step {
    Event(RawEvent),
    Fail(io::ErrorKind),
}

pub struct MockBackend {
    name: Option<String>,
    ranges: HashMap<u16, (i32, i32)>,
    rumble_id: Option<i16>,
    failing_rumble: bool,
    script: VecDeque<Step>,
    calls: MockCalls,
    clock: Option<(ManualClock, Duration)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            name: None,
            ranges: HashMap::new(),
            rumble_id: None,
            failing_rumble: false,
            script: VecDeque::new(),
            calls: MockCalls::default(),
            clock: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_axis(mut self, code: u16, min: i32, max: i32) -> Self {
        self.ranges.insert(code, (min, max));
        self
    }

    pub fn with_rumble(mut self, effect_id: i16) -> Self {
        self.rumble_id = Some(effect_id);
        self
    }

    pub fn with_failing_rumble(mut self) -> Self {
        self.failing_rumble = true;
        self
    }

    pub fn with_event(mut self, event: RawEvent) -> Self {
        self.script.push_back(Step::Event(event));
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = RawEvent>) -> Self {
        self.script.extend(events.into_iter().map(Step::Event));
        self
    }

    pub fn with_error(mut self, kind: io::ErrorKind) -> Self {
        self.script.push_back(Step::Fail(kind));
        self
    }

    pub fn with_calls(mut self, calls: &MockCalls) -> Self {
        self.calls = calls.clone();
        self
    }

    /// Advance `clock` by `tick` on every read, as if events arrived at a fixed rate.
    pub fn with_clock(mut self, clock: &ManualClock, tick: Duration) -> Self {
        self.clock = Some((clock.clone(), tick));
        self
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for MockBackend {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn query_axis_range(&self, code: u16) -> Option<(i32, i32)> {
        self.ranges.get(&code).copied()
    }

    fn register_rumble_effect(&mut self) -> Option<i16> {
        self.rumble_id
    }

    fn read_event(&mut self) -> io::Result<RawEvent> {
        self.calls.0.borrow_mut().reads += 1;
        if let Some((clock, tick)) = &self.clock {
            clock.advance(*tick);
        }
        match self.script.pop_front() {
            Some(Step::Event(event)) => Ok(event),
            Some(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")),
        }
    }

    fn update_rumble_effect(&mut self, effect_id: i16, effect: &RumbleEffect) -> io::Result<()> {
        if self.failing_rumble {
            return Err(io::Error::other("effect rejected"));
        }
        self.calls
            .0
            .borrow_mut()
            .rumble_updates
            .push((effect_id, *effect));
        Ok(())
    }

    fn play_effect(&mut self, _effect_id: i16) -> io::Result<()> {
        if self.failing_rumble {
            return Err(io::Error::other("effect rejected"));
        }
        self.calls.0.borrow_mut().plays += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.calls.0.borrow_mut().closes += 1;
    }
}
