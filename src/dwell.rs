//! Dwell timer: arms a target once the pointer has stayed on it long
//! enough, and disarms it after the pointer has been away long enough.
//!
//! # States
//!
//! | Phase      | Meaning                                                    |
//! |------------|------------------------------------------------------------|
//! | `Idle`     | No target tracked                                          |
//! | `Dwelling` | Pointer is on a target; the dwell deadline is pending      |
//! | `Armed`    | Dwell completed, `on_arm` has fired once for this entry    |
//! | `Grace`    | Armed, but the pointer left; the grace deadline is pending |
//!
//! Deadlines are plain timestamps owned by the timer.  They fire from
//! [`DwellTimer::poll_timers`] once the [`Clock`] reaches them; cancelling a
//! deadline simply forgets it, so a cancelled callback can never run late.
//! Every input fires due deadlines before it is applied, and queries report
//! due deadlines as already fired.

use crate::traits::Clock;
use log::debug;

/// Default time the pointer must stay in a zone before arming (ms).
pub const DWELL_TIME_MS: u64 = 200;

/// Default time the pointer may spend outside an armed zone (ms).
pub const EXIT_GRACE_MS: u64 = 50;

/// Receives arm/disarm notifications from a [`DwellTimer`].
pub trait DwellObserver {
    /// The dwell on `target` completed.
    fn on_arm(&mut self, target: &str);

    /// The armed target was released (grace expired or the timer was
    /// destroyed).
    fn on_disarm(&mut self);
}

/// A [`DwellObserver`] built from two closures.
pub struct Callbacks<A, D> {
    pub on_arm: A,
    pub on_disarm: D,
}

impl<A, D> DwellObserver for Callbacks<A, D>
where
    A: FnMut(&str),
    D: FnMut(),
{
    fn on_arm(&mut self, target: &str) {
        (self.on_arm)(target)
    }

    fn on_disarm(&mut self) {
        (self.on_disarm)()
    }
}

/// Observable phase of a [`DwellTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellPhase {
    Idle,
    Dwelling,
    Armed,
    Grace,
}

/// Snapshot returned by [`DwellTimer::state`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DwellState {
    /// Target being tracked (dwelling on or armed), if any.
    pub target: Option<String>,
    pub armed: bool,
}

/// Tracks dwell time on one category of target.
pub struct DwellTimer<C: Clock, O: DwellObserver> {
    clock: C,
    observer: O,
    dwell_ms: u64,
    grace_ms: u64,
    target: Option<String>,
    armed: bool,
    dwell_deadline: Option<u64>,
    grace_deadline: Option<u64>,
}

impl<C: Clock, O: DwellObserver> DwellTimer<C, O> {
    /// Create an idle timer.
    pub fn new(clock: C, observer: O, dwell_ms: u64, grace_ms: u64) -> Self {
        Self {
            clock,
            observer,
            dwell_ms,
            grace_ms,
            target: None,
            armed: false,
            dwell_deadline: None,
            grace_deadline: None,
        }
    }

    /// Create an idle timer with [`DWELL_TIME_MS`] and [`EXIT_GRACE_MS`].
    pub fn with_defaults(clock: C, observer: O) -> Self {
        Self::new(clock, observer, DWELL_TIME_MS, EXIT_GRACE_MS)
    }

    /// The pointer is inside the zone of `target`.
    ///
    /// Re-entering the armed target cancels a pending grace period.  A
    /// different target discards all progress and starts a fresh dwell.
    /// Repeated calls for the same dwelling target do not restart the dwell.
    pub fn enter_target(&mut self, target: &str) {
        self.poll_timers();
        self.grace_deadline = None;

        if self.armed && self.target.as_deref() == Some(target) {
            return;
        }

        if self.target.as_deref() != Some(target) {
            self.clear_dwell();
            self.target = Some(target.to_string());
        }

        if self.dwell_deadline.is_none() && !self.armed {
            let deadline = self.clock.now_ms() + self.dwell_ms;
            debug!("dwell on {} until {}ms", target, deadline);
            self.dwell_deadline = Some(deadline);
        }
    }

    /// The pointer is outside every zone this timer cares about.
    ///
    /// A pending dwell is abandoned without any callback.  An armed target
    /// enters its grace period; the grace deadline is not pushed back by
    /// repeated calls.
    pub fn leave_target(&mut self) {
        self.poll_timers();
        self.dwell_deadline = None;

        if self.armed {
            if self.grace_deadline.is_none() {
                self.grace_deadline = Some(self.clock.now_ms() + self.grace_ms);
            }
        } else {
            self.target = None;
        }
    }

    /// Reset to idle immediately, cancelling both deadlines, without
    /// notifying the observer.
    pub fn clear_dwell(&mut self) {
        self.dwell_deadline = None;
        self.grace_deadline = None;
        self.armed = false;
        self.target = None;
    }

    /// Fire every deadline the clock has reached.
    pub fn poll_timers(&mut self) {
        let now = self.clock.now_ms();

        if self.dwell_deadline.is_some_and(|at| at <= now) {
            self.dwell_deadline = None;
            self.armed = true;
            if let Some(target) = self.target.clone() {
                debug!("armed {}", target);
                self.observer.on_arm(&target);
            }
        }

        if self.grace_deadline.is_some_and(|at| at <= now) {
            self.grace_deadline = None;
            self.armed = false;
            if let Some(target) = self.target.take() {
                debug!("disarmed {}", target);
            }
            self.observer.on_disarm();
        }
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.dwell_deadline, self.grace_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn state(&self) -> DwellState {
        let (target, armed) = self.settled();
        DwellState {
            target: target.map(str::to_string),
            armed,
        }
    }

    pub fn phase(&self) -> DwellPhase {
        let now = self.clock.now_ms();
        let dwell_pending = self.dwell_deadline.is_some_and(|at| at > now);
        let grace_pending = self.grace_deadline.is_some_and(|at| at > now);
        match (self.settled().1, grace_pending, dwell_pending) {
            (true, true, _) => DwellPhase::Grace,
            (true, false, _) => DwellPhase::Armed,
            (false, _, true) => DwellPhase::Dwelling,
            (false, _, false) => DwellPhase::Idle,
        }
    }

    /// Whether `target` is the currently armed target.
    pub fn is_armed_on(&self, target: &str) -> bool {
        let (current, armed) = self.settled();
        armed && current == Some(target)
    }

    /// Target and armed flag as they will be once due deadlines fire.
    fn settled(&self) -> (Option<&str>, bool) {
        let now = self.clock.now_ms();
        if self.grace_deadline.is_some_and(|at| at <= now) {
            return (None, false);
        }
        let armed = self.armed || self.dwell_deadline.is_some_and(|at| at <= now);
        (self.target.as_deref(), armed)
    }

    /// Cancel all pending deadlines and notify the observer once.
    ///
    /// Must be called whenever a drag ends, armed or not.
    pub fn destroy(mut self) {
        self.clear_dwell();
        self.observer.on_disarm();
    }
}

//  Tests
