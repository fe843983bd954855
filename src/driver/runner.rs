//! The driver loop.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{Clock, Control, CountdownEvent, RunOutcome, SystemClock};
use crate::engine::{CountdownEngine, CountdownError};
use crate::notify::{Completion, CompletionNotifier};
use crate::types::{CountdownPhase, CountdownSpec, TickResult};

// ============================================================================
// CountdownDriver
// ============================================================================

/// Drives a [`CountdownEngine`] with a one-second ticker.
pub struct CountdownDriver<N, C = SystemClock> {
    engine: CountdownEngine,
    label: Option<String>,
    notifier: N,
    clock: C,
    event_tx: mpsc::UnboundedSender<CountdownEvent>,
    control_rx: mpsc::UnboundedReceiver<Control>,
}

impl<N: CompletionNotifier, C: Clock> CountdownDriver<N, C> {
    /// Creates a driver around an idle engine.
    pub fn new(
        notifier: N,
        clock: C,
        event_tx: mpsc::UnboundedSender<CountdownEvent>,
        control_rx: mpsc::UnboundedReceiver<Control>,
    ) -> Self {
        Self {
            engine: CountdownEngine::new(),
            label: None,
            notifier,
            clock,
            event_tx,
            control_rx,
        }
    }

    /// Sets the label carried by the completion.
    #[must_use]
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Consumes the driver, closing the event channel.
    pub fn into_notifier(self) -> N {
        self.notifier
    }

    /// Starts a countdown at the clock's current instant.
    ///
    /// # Errors
    ///
    /// Returns the engine's error unchanged; nothing is emitted in that case.
    pub fn start(&mut self, spec: CountdownSpec) -> Result<(), CountdownError> {
        let now = self.clock.now();
        self.start_at(spec, now)
    }

    fn start_at(&mut self, spec: CountdownSpec, now: DateTime<Utc>) -> Result<(), CountdownError> {
        self.engine.start(spec, now)?;
        let target = self.engine.target().unwrap_or(now);
        info!(%target, "countdown started");
        // A closed event channel only means nobody is rendering
        let _ = self.event_tx.send(CountdownEvent::Started {
            remaining: self.engine.snapshot(now),
            target,
        });
        Ok(())
    }

    /// Runs the tick loop until the countdown expires or is cancelled.
    ///
    /// The first tick fires immediately, so a freshly started countdown is
    /// rendered without waiting a second.
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut controls_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    if let Some(outcome) = self.on_tick(now)? {
                        return Ok(outcome);
                    }
                }
                control = self.control_rx.recv(), if controls_open => {
                    match control {
                        Some(control) => {
                            let now = self.clock.now();
                            if let Some(outcome) = self.handle_control(control, now)? {
                                return Ok(outcome);
                            }
                        }
                        None => {
                            debug!("control channel closed");
                            controls_open = false;
                        }
                    }
                    // Without controls only a running countdown can still finish
                    if !controls_open && self.engine.phase() != CountdownPhase::Running {
                        return Ok(RunOutcome::Cancelled);
                    }
                }
                result = &mut ctrl_c => {
                    result.context("Failed to listen for Ctrl-C")?;
                    info!("interrupted");
                    return Ok(RunOutcome::Cancelled);
                }
            }
        }
    }

    /// Advances the countdown to `now`.
    ///
    /// Returns `Some(RunOutcome::Expired)` on the tick that expires the
    /// countdown. Ticks outside the running phase do nothing.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Result<Option<RunOutcome>> {
        if self.engine.phase() != CountdownPhase::Running {
            return Ok(None);
        }

        match self.engine.tick(now) {
            TickResult::Remaining(remaining) => {
                self.event_tx
                    .send(CountdownEvent::Tick {
                        remaining,
                        progress: self.engine.progress(now),
                    })
                    .context("Failed to send tick event")?;
                Ok(None)
            }
            TickResult::Expired => {
                self.handle_expired(now)?;
                Ok(Some(RunOutcome::Expired))
            }
        }
    }

    /// Applies one control command at `now`.
    ///
    /// Commands the engine refuses are reported as
    /// [`CountdownEvent::Rejected`] and leave the state unchanged.
    pub fn handle_control(
        &mut self,
        control: Control,
        now: DateTime<Utc>,
    ) -> Result<Option<RunOutcome>> {
        debug!(?control, phase = %self.engine.phase(), "control received");

        let applied = match control {
            Control::Start(spec) => self
                .start_at(spec, now)
                .map(|()| None)
                .map_err(|e| e.to_string()),
            Control::Pause => self
                .engine
                .pause(now)
                .map(|()| {
                    Some(CountdownEvent::Paused {
                        remaining: self.engine.snapshot(now),
                    })
                })
                .map_err(|e| e.to_string()),
            Control::Resume => self
                .engine
                .resume(now)
                .map(|()| {
                    Some(CountdownEvent::Resumed {
                        remaining: self.engine.snapshot(now),
                    })
                })
                .map_err(|e| e.to_string()),
            Control::Reset => {
                self.engine.reset();
                Ok(Some(CountdownEvent::Reset))
            }
            Control::Quit => {
                info!("quit requested");
                return Ok(Some(RunOutcome::Cancelled));
            }
        };

        let event = match applied {
            Ok(Some(event)) => event,
            // Started is emitted by start_at
            Ok(None) => return Ok(None),
            Err(reason) => {
                debug!(%reason, "control rejected");
                CountdownEvent::Rejected { reason }
            }
        };
        self.event_tx
            .send(event)
            .context("Failed to send control event")?;
        Ok(None)
    }

    /// Reports the expiry and runs the notifier once.
    fn handle_expired(&mut self, now: DateTime<Utc>) -> Result<()> {
        let target = self.engine.target().unwrap_or(now);
        info!(%target, "countdown expired");

        self.event_tx
            .send(CountdownEvent::Expired { target })
            .context("Failed to send expired event")?;

        let completion = Completion::new(self.label.clone(), target);
        if let Err(e) = self.notifier.notify(&completion) {
            warn!(notifier = self.notifier.name(), error = %e, "completion notification failed");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ManualClock;
    use crate::engine::{InputError, StateError};
    use crate::notify::MockNotifier;
    use crate::types::RemainingTime;
    use chrono::{TimeDelta, TimeZone};
    use std::sync::Arc;

    type TestDriver = CountdownDriver<Arc<MockNotifier>, ManualClock>;

    struct Harness {
        driver: TestDriver,
        notifier: Arc<MockNotifier>,
        clock: ManualClock,
        events: mpsc::UnboundedReceiver<CountdownEvent>,
        controls: mpsc::UnboundedSender<Control>,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn secs(n: i64) -> TimeDelta {
        TimeDelta::seconds(n)
    }

    fn harness() -> Harness {
        let notifier = Arc::new(MockNotifier::new());
        let clock = ManualClock::new(t0());
        let (event_tx, events) = mpsc::unbounded_channel();
        let (controls, control_rx) = mpsc::unbounded_channel();
        let driver = CountdownDriver::new(Arc::clone(&notifier), clock.clone(), event_tx, control_rx)
            .with_label(Some("Tea".to_string()));
        Harness {
            driver,
            notifier,
            clock,
            events,
            controls,
        }
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<CountdownEvent>) -> Vec<CountdownEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    mod start_tests {
        use super::*;

        #[test]
        fn test_start_emits_started() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(5)).unwrap();

            assert_eq!(
                drain(&mut h.events),
                vec![CountdownEvent::Started {
                    remaining: RemainingTime::from_seconds(5),
                    target: t0() + secs(5),
                }]
            );
            assert_eq!(h.driver.engine().phase(), CountdownPhase::Running);
        }

        #[test]
        fn test_start_error_is_returned_without_event() {
            let mut h = harness();
            let err = h.driver.start(CountdownSpec::duration(0)).unwrap_err();

            assert!(matches!(err, CountdownError::Input(InputError::NotPositive)));
            assert!(drain(&mut h.events).is_empty());
        }

        #[test]
        fn test_start_control_while_running_is_rejected() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(5)).unwrap();
            drain(&mut h.events);

            let outcome = h
                .driver
                .handle_control(Control::Start(CountdownSpec::duration(9)), t0())
                .unwrap();

            assert_eq!(outcome, None);
            assert_eq!(
                drain(&mut h.events),
                vec![CountdownEvent::Rejected {
                    reason: StateError::AlreadyActive.to_string()
                }]
            );
            assert_eq!(h.driver.engine().total_seconds(), 5);
        }
    }

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_counts_down_then_expires_once() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(5)).unwrap();
            drain(&mut h.events);

            assert_eq!(h.driver.on_tick(t0() + secs(1)).unwrap(), None);
            match drain(&mut h.events).as_slice() {
                [CountdownEvent::Tick {
                    remaining,
                    progress,
                }] => {
                    assert_eq!(*remaining, RemainingTime::from_seconds(4));
                    assert!((progress - 0.2).abs() < 1e-9);
                }
                other => panic!("unexpected events: {other:?}"),
            }

            assert_eq!(
                h.driver.on_tick(t0() + secs(5)).unwrap(),
                Some(RunOutcome::Expired)
            );
            assert_eq!(
                drain(&mut h.events),
                vec![CountdownEvent::Expired {
                    target: t0() + secs(5)
                }]
            );
            assert_eq!(h.notifier.notify_count(), 1);

            // Later ticks neither emit nor notify again
            assert_eq!(h.driver.on_tick(t0() + secs(6)).unwrap(), None);
            assert!(drain(&mut h.events).is_empty());
            assert_eq!(h.notifier.notify_count(), 1);
        }

        #[test]
        fn test_completion_carries_label_and_target() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(3)).unwrap();
            h.driver.on_tick(t0() + secs(10)).unwrap();

            let calls = h.notifier.get_calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].label.as_deref(), Some("Tea"));
            assert_eq!(calls[0].target, t0() + secs(3));
        }

        #[test]
        fn test_notifier_failure_is_ignored() {
            let mut h = harness();
            h.notifier.set_should_fail(true);
            h.driver.start(CountdownSpec::duration(1)).unwrap();

            let outcome = h.driver.on_tick(t0() + secs(1)).unwrap();

            assert_eq!(outcome, Some(RunOutcome::Expired));
            assert_eq!(h.driver.engine().phase(), CountdownPhase::Expired);
            assert_eq!(h.notifier.notify_count(), 1);
        }

        #[test]
        fn test_tick_while_idle_or_paused_is_silent() {
            let mut h = harness();
            assert_eq!(h.driver.on_tick(t0()).unwrap(), None);

            h.driver.start(CountdownSpec::duration(5)).unwrap();
            h.driver.handle_control(Control::Pause, t0() + secs(2)).unwrap();
            drain(&mut h.events);

            assert_eq!(h.driver.on_tick(t0() + secs(60)).unwrap(), None);
            assert!(drain(&mut h.events).is_empty());
            assert_eq!(h.notifier.notify_count(), 0);
        }
    }

    mod control_tests {
        use super::*;

        #[test]
        fn test_pause_resume_keeps_remaining() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(10)).unwrap();
            drain(&mut h.events);

            h.driver.handle_control(Control::Pause, t0() + secs(4)).unwrap();
            h.driver
                .handle_control(Control::Resume, t0() + secs(100))
                .unwrap();

            assert_eq!(
                drain(&mut h.events),
                vec![
                    CountdownEvent::Paused {
                        remaining: RemainingTime::from_seconds(6)
                    },
                    CountdownEvent::Resumed {
                        remaining: RemainingTime::from_seconds(6)
                    },
                ]
            );
            assert_eq!(h.driver.engine().target(), Some(t0() + secs(106)));
        }

        #[test]
        fn test_invalid_transitions_are_rejected() {
            let mut h = harness();

            h.driver.handle_control(Control::Pause, t0()).unwrap();
            h.driver.handle_control(Control::Resume, t0()).unwrap();

            assert_eq!(
                drain(&mut h.events),
                vec![
                    CountdownEvent::Rejected {
                        reason: StateError::NotRunning.to_string()
                    },
                    CountdownEvent::Rejected {
                        reason: StateError::NotPaused.to_string()
                    },
                ]
            );
            assert_eq!(h.driver.engine().phase(), CountdownPhase::Idle);
        }

        #[test]
        fn test_reset_then_restart() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(10)).unwrap();
            h.driver.handle_control(Control::Reset, t0() + secs(3)).unwrap();
            assert_eq!(h.driver.engine().phase(), CountdownPhase::Idle);

            h.driver
                .handle_control(Control::Start(CountdownSpec::duration(10)), t0() + secs(5))
                .unwrap();
            assert_eq!(h.driver.engine().target(), Some(t0() + secs(15)));

            let events = drain(&mut h.events);
            assert_eq!(events[1], CountdownEvent::Reset);
            assert!(matches!(events[2], CountdownEvent::Started { .. }));
        }

        #[test]
        fn test_quit_cancels() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(10)).unwrap();
            let outcome = h.driver.handle_control(Control::Quit, t0()).unwrap();
            assert_eq!(outcome, Some(RunOutcome::Cancelled));
            assert_eq!(h.notifier.notify_count(), 0);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_run_expires_on_first_tick_when_target_passed() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(5)).unwrap();
            h.clock.advance_secs(30);

            let outcome = h.driver.run().await.unwrap();

            assert_eq!(outcome, RunOutcome::Expired);
            assert_eq!(h.notifier.notify_count(), 1);
            assert!(drain(&mut h.events)
                .iter()
                .any(|e| matches!(e, CountdownEvent::Expired { .. })));
        }

        #[tokio::test]
        async fn test_run_returns_on_quit() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(3600)).unwrap();
            h.controls.send(Control::Quit).unwrap();

            let outcome = h.driver.run().await.unwrap();

            assert_eq!(outcome, RunOutcome::Cancelled);
            assert_eq!(h.notifier.notify_count(), 0);
        }

        #[tokio::test]
        async fn test_run_cancels_when_controls_close_after_reset() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(3600)).unwrap();
            h.controls.send(Control::Reset).unwrap();
            drop(h.controls);

            let outcome = h.driver.run().await.unwrap();
            assert_eq!(outcome, RunOutcome::Cancelled);
        }

        #[tokio::test]
        async fn test_run_cancels_when_controls_close_while_paused() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(3600)).unwrap();
            h.controls.send(Control::Pause).unwrap();
            drop(h.controls);

            let outcome = h.driver.run().await.unwrap();
            assert_eq!(outcome, RunOutcome::Cancelled);
            assert_eq!(h.driver.engine().phase(), CountdownPhase::Paused);
        }

        #[tokio::test]
        async fn test_run_keeps_running_when_controls_close() {
            let mut h = harness();
            h.driver.start(CountdownSpec::duration(1)).unwrap();
            drop(h.controls);

            let clock = h.clock.clone();
            let advance = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                clock.advance_secs(1);
            });

            let outcome = h.driver.run().await.unwrap();
            advance.await.unwrap();

            assert_eq!(outcome, RunOutcome::Expired);
            assert_eq!(h.notifier.notify_count(), 1);
        }
    }
}
