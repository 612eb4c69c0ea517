//! Debounced dwell confirmation.
//!
//! A side only counts once the player has held it continuously for the
//! configured detection time. Any interruption (center, the opposite side,
//! or a frame with no face) restarts the clock from zero.
//!
//! # States
//! ```text
//!            left/right                same side, elapsed >= detection_time
//!   Idle ─────────────────► Tracking ────────────────────────────────────► Confirmed
//!    ▲                        │  │                                           │
//!    │    center / none       │  │ opposite side: Tracking(opposite, now)    │
//!    └────────────────────────┘  └──────────────┐                            │
//!    ▲                                          ▼                            │
//!    └──────────────────────── reset_detection() ◄───────────────────────────┘
//! ```
//!
//! `Confirmed` is terminal for a round; only `reset_detection` leaves it.
//! The transition itself is the pure function [`transition`], so the
//! debounce rules can be tested without a video feed.

use std::fmt;
use std::time::Duration;

use mindread_models::{Side, Zone};
use tracing::{debug, info};

/// Dwell state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DwellPhase {
    /// No side is being held.
    #[default]
    Idle,
    /// A side has been held continuously since `since`.
    Tracking { side: Side, since: Duration },
    /// The side was held for the full detection time.
    Confirmed {
        side: Side,
        since: Duration,
        held_for: Duration,
    },
}

impl DwellPhase {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, DwellPhase::Confirmed { .. })
    }
}

impl fmt::Display for DwellPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DwellPhase::Idle => write!(f, "idle"),
            DwellPhase::Tracking { side, .. } => write!(f, "tracking({side})"),
            DwellPhase::Confirmed { side, .. } => write!(f, "confirmed({side})"),
        }
    }
}

/// Outcome of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: DwellPhase,
    /// Set only on the tick that enters `Confirmed`.
    pub confirmed: Option<Side>,
}

/// Pure dwell transition for one frame observed at `now`.
pub fn transition(
    phase: DwellPhase,
    zone: Zone,
    now: Duration,
    detection_time: Duration,
) -> Transition {
    let next = match (phase, zone.side()) {
        // Terminal until an external reset.
        (DwellPhase::Confirmed { .. }, _) => phase,

        (DwellPhase::Idle, None) => DwellPhase::Idle,
        (DwellPhase::Idle, Some(side)) => DwellPhase::Tracking { side, since: now },

        (DwellPhase::Tracking { .. }, None) => DwellPhase::Idle,
        (DwellPhase::Tracking { side, since }, Some(observed)) if observed == side => {
            let held_for = now.saturating_sub(since);
            if held_for >= detection_time {
                DwellPhase::Confirmed {
                    side,
                    since,
                    held_for,
                }
            } else {
                phase
            }
        }
        (DwellPhase::Tracking { .. }, Some(observed)) => DwellPhase::Tracking {
            side: observed,
            since: now,
        },
    };

    let confirmed = match (phase, next) {
        (DwellPhase::Tracking { .. }, DwellPhase::Confirmed { side, .. }) => Some(side),
        _ => None,
    };

    Transition {
        phase: next,
        confirmed,
    }
}

/// Snapshot of the dwell state for presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellState {
    /// Tracked side, or the last observed `Center`/`None` while idle.
    pub current_zone: Zone,
    /// Start of the continuous hold, if a side is held.
    pub zone_start: Option<Duration>,
    /// `max(0, now - zone_start)` while tracking, else 0.
    pub elapsed_seconds: f64,
}

/// Result of feeding one frame into a `DwellTimer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellUpdate {
    /// Zone observed in this frame.
    pub zone: Zone,
    /// Continuous hold time of the tracked side, in seconds.
    pub elapsed_seconds: f64,
    /// Side confirmed by this frame, if any.
    pub confirmed: Option<Side>,
}

type ConfirmCallback = Box<dyn FnMut(Side) + Send>;

/// Owned dwell state machine for one round.
pub struct DwellTimer {
    detection_time: Duration,
    phase: DwellPhase,
    last_zone: Zone,
    last_now: Duration,
    on_confirm: Option<ConfirmCallback>,
}

impl fmt::Debug for DwellTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DwellTimer")
            .field("detection_time", &self.detection_time)
            .field("phase", &self.phase)
            .field("last_zone", &self.last_zone)
            .field("last_now", &self.last_now)
            .field("has_callback", &self.on_confirm.is_some())
            .finish()
    }
}

impl DwellTimer {
    pub fn new(detection_time: Duration) -> Self {
        Self {
            detection_time,
            phase: DwellPhase::Idle,
            last_zone: Zone::Center,
            last_now: Duration::ZERO,
            on_confirm: None,
        }
    }

    /// Invoke `callback` with the side each time the timer enters `Confirmed`.
    pub fn with_confirmation_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Side) + Send + 'static,
    {
        self.on_confirm = Some(Box::new(callback));
        self
    }

    pub fn detection_time(&self) -> Duration {
        self.detection_time
    }

    pub fn phase(&self) -> DwellPhase {
        self.phase
    }

    /// Feed the zone observed in the frame captured at `now`.
    pub fn tick(&mut self, zone: Zone, now: Duration) -> DwellUpdate {
        let previous = self.phase;
        let Transition { phase, confirmed } = transition(previous, zone, now, self.detection_time);
        self.phase = phase;
        self.last_zone = zone;
        self.last_now = now;

        if phase != previous {
            match phase {
                DwellPhase::Tracking { side, .. } => {
                    debug!(side = %side, at_secs = now.as_secs_f64(), "Dwell started");
                }
                DwellPhase::Idle => {
                    debug!(interrupted_by = %zone, "Dwell reset");
                }
                DwellPhase::Confirmed { .. } => {}
            }
        }

        if let Some(side) = confirmed {
            info!(
                side = %side,
                held_secs = self.elapsed_at(now).as_secs_f64(),
                "Side confirmed"
            );
            if let Some(callback) = self.on_confirm.as_mut() {
                callback(side);
            }
        }

        DwellUpdate {
            zone,
            elapsed_seconds: self.elapsed_at(now).as_secs_f64(),
            confirmed,
        }
    }

    /// Return to `Idle`, discarding any partial or confirmed hold.
    pub fn reset_detection(&mut self) {
        if self.phase != DwellPhase::Idle {
            debug!(phase = %self.phase, "Dwell detection reset");
        }
        self.phase = DwellPhase::Idle;
        self.last_zone = Zone::Center;
    }

    /// State as of the most recent tick.
    pub fn state(&self) -> DwellState {
        let (current_zone, zone_start) = match self.phase {
            DwellPhase::Idle => (self.last_zone, None),
            DwellPhase::Tracking { side, since } | DwellPhase::Confirmed { side, since, .. } => {
                (side.into(), Some(since))
            }
        };
        DwellState {
            current_zone,
            zone_start,
            elapsed_seconds: self.elapsed_at(self.last_now).as_secs_f64(),
        }
    }

    fn elapsed_at(&self, now: Duration) -> Duration {
        match self.phase {
            DwellPhase::Idle => Duration::ZERO,
            DwellPhase::Tracking { since, .. } => now.saturating_sub(since),
            DwellPhase::Confirmed { held_for, .. } => held_for,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const DETECTION: Duration = Duration::from_secs(5);
    const FRAME: Duration = Duration::from_millis(100);

    /// Feed `zone` every frame from `start` for `duration`; returns the next
    /// timestamp and every confirmation seen.
    fn hold(
        timer: &mut DwellTimer,
        zone: Zone,
        start: Duration,
        duration: Duration,
    ) -> (Duration, Vec<Side>) {
        let mut now = start;
        let mut confirmations = Vec::new();
        while now <= start + duration {
            if let Some(side) = timer.tick(zone, now).confirmed {
                confirmations.push(side);
            }
            now += FRAME;
        }
        (now, confirmations)
    }

    #[test]
    fn test_idle_ignores_center_and_none() {
        let mut timer = DwellTimer::new(DETECTION);
        let (_, confirmed) = hold(&mut timer, Zone::Center, Duration::ZERO, Duration::from_secs(10));
        assert!(confirmed.is_empty());
        assert_eq!(timer.phase(), DwellPhase::Idle);

        timer.tick(Zone::None, Duration::from_secs(11));
        assert_eq!(timer.phase(), DwellPhase::Idle);
        assert_eq!(timer.state().zone_start, None);
        assert_eq!(timer.state().elapsed_seconds, 0.0);
    }

    #[test]
    fn test_idle_to_tracking() {
        let mut timer = DwellTimer::new(DETECTION);
        let update = timer.tick(Zone::Left, Duration::from_secs(2));
        assert_eq!(update.elapsed_seconds, 0.0);
        assert_eq!(
            timer.phase(),
            DwellPhase::Tracking {
                side: Side::Left,
                since: Duration::from_secs(2)
            }
        );
        assert_eq!(timer.state().zone_start, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_exactly_detection_time_fires_once() {
        let mut timer = DwellTimer::new(DETECTION);
        assert_eq!(timer.tick(Zone::Right, Duration::ZERO).confirmed, None);
        assert_eq!(timer.tick(Zone::Right, Duration::from_millis(4999)).confirmed, None);

        let update = timer.tick(Zone::Right, DETECTION);
        assert_eq!(update.confirmed, Some(Side::Right));
        assert_eq!(update.elapsed_seconds, 5.0);

        // Holding on afterwards never fires again.
        let (_, more) = hold(&mut timer, Zone::Right, DETECTION + FRAME, Duration::from_secs(20));
        assert!(more.is_empty());
        assert!(timer.phase().is_confirmed());
    }

    #[test]
    fn test_constant_side_fires_exactly_one_confirmation() {
        let mut timer = DwellTimer::new(DETECTION);
        let (_, confirmed) = hold(&mut timer, Zone::Right, Duration::ZERO, DETECTION);
        assert_eq!(confirmed, vec![Side::Right]);
    }

    #[test]
    fn test_center_interruption_restarts_clock() {
        let mut timer = DwellTimer::new(DETECTION);

        // Hold left for just under the detection time.
        let (now, confirmed) = hold(
            &mut timer,
            Zone::Left,
            Duration::ZERO,
            DETECTION - Duration::from_millis(200),
        );
        assert!(confirmed.is_empty());

        // One center frame resets.
        timer.tick(Zone::Center, now);
        assert_eq!(timer.phase(), DwellPhase::Idle);

        // Left again: nothing may fire before a full fresh window has elapsed.
        let restart = now + FRAME;
        let mut t = restart;
        while t < restart + DETECTION {
            let update = timer.tick(Zone::Left, t);
            assert_eq!(update.confirmed, None, "fired early at {t:?}");
            t += FRAME;
        }
        let update = timer.tick(Zone::Left, restart + DETECTION);
        assert_eq!(update.confirmed, Some(Side::Left));
    }

    #[test]
    fn test_opposite_side_restarts_tracking() {
        let mut timer = DwellTimer::new(DETECTION);
        timer.tick(Zone::Left, Duration::ZERO);
        timer.tick(Zone::Left, Duration::from_secs(4));

        let update = timer.tick(Zone::Right, Duration::from_millis(4500));
        assert_eq!(update.elapsed_seconds, 0.0);
        assert_eq!(
            timer.phase(),
            DwellPhase::Tracking {
                side: Side::Right,
                since: Duration::from_millis(4500)
            }
        );
        assert_eq!(timer.tick(Zone::Right, Duration::from_secs(9)).confirmed, None);
        assert_eq!(
            timer.tick(Zone::Right, Duration::from_millis(9500)).confirmed,
            Some(Side::Right)
        );
    }

    #[test]
    fn test_lost_face_silently_resets() {
        let mut timer = DwellTimer::new(DETECTION);
        timer.tick(Zone::Right, Duration::ZERO);
        timer.tick(Zone::Right, Duration::from_secs(3));
        let update = timer.tick(Zone::None, Duration::from_millis(3100));
        assert_eq!(update.confirmed, None);
        assert_eq!(timer.phase(), DwellPhase::Idle);
        assert_eq!(timer.state().elapsed_seconds, 0.0);
    }

    #[test]
    fn test_state_reports_observed_idle_zone() {
        let mut timer = DwellTimer::new(DETECTION);
        assert_eq!(timer.state().current_zone, Zone::Center);

        timer.tick(Zone::Left, Duration::ZERO);
        assert_eq!(timer.state().current_zone, Zone::Left);

        timer.tick(Zone::None, FRAME);
        let state = timer.state();
        assert_eq!(state.current_zone, Zone::None);
        assert_eq!(state.zone_start, None);

        timer.tick(Zone::Center, FRAME * 2);
        assert_eq!(timer.state().current_zone, Zone::Center);
    }

    #[test]
    fn test_reset_detection_leaves_confirmed() {
        let mut timer = DwellTimer::new(DETECTION);
        hold(&mut timer, Zone::Left, Duration::ZERO, DETECTION);
        assert!(timer.phase().is_confirmed());

        timer.reset_detection();
        assert_eq!(timer.phase(), DwellPhase::Idle);
        assert_eq!(timer.state().current_zone, Zone::Center);

        let (_, confirmed) = hold(
            &mut timer,
            Zone::Right,
            Duration::from_secs(10),
            DETECTION,
        );
        assert_eq!(confirmed, vec![Side::Right]);
    }

    #[test]
    fn test_clock_going_backwards_clamps_elapsed() {
        let mut timer = DwellTimer::new(DETECTION);
        timer.tick(Zone::Left, Duration::from_secs(10));
        let update = timer.tick(Zone::Left, Duration::from_secs(9));
        assert_eq!(update.elapsed_seconds, 0.0);
        assert_eq!(update.confirmed, None);
    }

    #[test]
    fn test_callback_invoked_on_confirmation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut timer = DwellTimer::new(Duration::from_secs(1))
            .with_confirmation_callback(move |side| sink.lock().unwrap().push(side));

        hold(&mut timer, Zone::Left, Duration::ZERO, Duration::from_secs(3));
        assert_eq!(*seen.lock().unwrap(), vec![Side::Left]);
    }

    #[test]
    fn test_transition_is_pure() {
        let phase = DwellPhase::Tracking {
            side: Side::Left,
            since: Duration::ZERO,
        };
        let a = transition(phase, Zone::Left, DETECTION, DETECTION);
        let b = transition(phase, Zone::Left, DETECTION, DETECTION);
        assert_eq!(a, b);
        assert_eq!(a.confirmed, Some(Side::Left));

        let confirmed = a.phase;
        let again = transition(confirmed, Zone::Left, DETECTION * 2, DETECTION);
        assert_eq!(again.phase, confirmed);
        assert_eq!(again.confirmed, None);
    }
}
