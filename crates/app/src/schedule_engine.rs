//! Schedule engine — fires due schedule rules against the actuator.
//!
//! The engine is driven by a periodic tick much faster than once a minute.
//! Each tick reads the clock, advances every rule's firing state (see
//! [`acctl_domain::schedule`]) and, for each rule that became due, asks the
//! [`StateVerifiedActuator`] for the rule's target state and journals the
//! outcome. While the clock is unsynchronized a tick does nothing at all.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use acctl_domain::actuation::ActuationOutcome;
use acctl_domain::error::AcCtlError;
use acctl_domain::schedule::{ClockTime, ScheduleRule};

use crate::ports::{ActuatorLine, KeyValueStore, SenseLine, TimeSource};
use crate::services::actuator::StateVerifiedActuator;
use crate::services::journal_service::JournalService;
use crate::services::schedule_store::ScheduleStore;

/// A rule fired during a tick, with the actuator's answer.
#[derive(Debug)]
pub struct Firing {
    pub rule: ScheduleRule,
    pub result: Result<ActuationOutcome, AcCtlError>,
}

/// Periodic evaluator of the schedule table.
pub struct ScheduleEngine<K, S, A, T> {
    store: Arc<ScheduleStore<K>>,
    actuator: Arc<StateVerifiedActuator<S, A>>,
    journal: Arc<JournalService<T>>,
    clock: T,
}

impl<K, S, A, T> ScheduleEngine<K, S, A, T>
where
    K: KeyValueStore,
    S: SenseLine,
    A: ActuatorLine,
    T: TimeSource,
{
    pub fn new(
        store: Arc<ScheduleStore<K>>,
        actuator: Arc<StateVerifiedActuator<S, A>>,
        journal: Arc<JournalService<T>>,
        clock: T,
    ) -> Self {
        Self {
            store,
            actuator,
            journal,
            clock,
        }
    }

    /// Evaluate the schedule once.
    ///
    /// Due rules fire in ascending slot order; each fire is journaled
    /// whatever its outcome.
    pub async fn tick(&self) -> Vec<Firing> {
        let Some(now) = self.clock.now() else {
            tracing::trace!("clock unsynchronized, skipping schedule tick");
            return Vec::new();
        };

        let due = self.store.observe(ClockTime::of(&now)).await;
        warn_on_conflicts(&due);

        let mut fired = Vec::with_capacity(due.len());
        for rule in due {
            tracing::info!(slot = %rule.id, time = %rule.time, target = %rule.target, "schedule due");
            let result = self.actuator.set_state(rule.target).await;
            let summary = match &result {
                Ok(outcome) => outcome.describe(rule.target),
                Err(err) => format!("error: {err}"),
            };
            self.journal.append(format!(
                "Schedule #{} ({}): turn {} -> {summary}",
                rule.id, rule.time, rule.target
            ));
            fired.push(Firing { rule, result });
        }
        fired
    }

    /// Tick every `period` until `shutdown` resolves.
    pub async fn run(&self, period: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = std::pin::pin!(shutdown);

        tracing::info!(period_ms = period.as_millis(), "schedule engine started");
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
        tracing::info!("schedule engine stopped");
    }
}

/// Rules sharing a minute but targeting different states end up in the
/// state of the highest slot. Flag it so operators notice.
fn warn_on_conflicts(due: &[ScheduleRule]) {
    if let Some((first, rest)) = due.split_first()
        && rest.iter().any(|rule| rule.target != first.target)
    {
        let slots: Vec<String> = due.iter().map(|rule| rule.id.to_string()).collect();
        tracing::warn!(
            slots = %slots.join(","),
            "conflicting schedules due in the same minute, last slot wins"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::actuator::RetryPolicy;
    use crate::services::control_service::ControlService;
    use crate::services::driver::{PulseDriver, PulseSettings};
    use crate::services::sensor::{DebouncedSensor, SensorSettings};
    use crate::test_support::{FakeUnit, InMemoryKv, ManualClock};
    use acctl_domain::power::PowerState;

    type Engine = ScheduleEngine<Arc<InMemoryKv>, Arc<FakeUnit>, Arc<FakeUnit>, Arc<ManualClock>>;

    struct Fixture {
        unit: Arc<FakeUnit>,
        clock: Arc<ManualClock>,
        store: Arc<ScheduleStore<Arc<InMemoryKv>>>,
        actuator: Arc<StateVerifiedActuator<Arc<FakeUnit>, Arc<FakeUnit>>>,
        journal: Arc<JournalService<Arc<ManualClock>>>,
        engine: Engine,
    }

    async fn fixture(initial: PowerState) -> Fixture {
        let unit = Arc::new(FakeUnit::new(initial));
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(ScheduleStore::load(Arc::new(InMemoryKv::default())).await);
        let actuator = Arc::new(StateVerifiedActuator::new(
            DebouncedSensor::new(Arc::clone(&unit), SensorSettings::default()),
            PulseDriver::new(Arc::clone(&unit), PulseSettings::default()),
            RetryPolicy::default(),
        ));
        let journal = Arc::new(JournalService::new(Arc::clone(&clock), 32));
        let engine = ScheduleEngine::new(
            Arc::clone(&store),
            Arc::clone(&actuator),
            Arc::clone(&journal),
            Arc::clone(&clock),
        );
        Fixture {
            unit,
            clock,
            store,
            actuator,
            journal,
            engine,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_exactly_once_within_matching_minute() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 7, 30, 1).await.unwrap();
        f.clock.set(7, 30);

        let fired = f.engine.tick().await;
        assert_eq!(fired.len(), 1);
        assert_eq!(
            fired[0].result.as_ref().unwrap(),
            &ActuationOutcome::Succeeded { attempts: 1 }
        );

        // The unit is switched off by hand; further ticks in the same minute
        // must not switch it back on.
        f.unit.set_state(PowerState::Off);
        for _ in 0..50 {
            assert!(f.engine.tick().await.is_empty());
        }
        assert_eq!(f.unit.presses(), 1);
        assert_eq!(f.unit.state(), PowerState::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn should_rearm_after_clock_moves_away_and_back() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 7, 30, 1).await.unwrap();

        f.clock.set(7, 30);
        assert_eq!(f.engine.tick().await.len(), 1);

        f.clock.set(7, 31);
        assert!(f.engine.tick().await.is_empty());

        f.unit.set_state(PowerState::Off);
        f.clock.set(7, 30);
        assert_eq!(f.engine.tick().await.len(), 1);
        assert_eq!(f.unit.presses(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_do_nothing_while_clock_unsynchronized() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 7, 30, 1).await.unwrap();

        f.clock.set(7, 30);
        assert_eq!(f.engine.tick().await.len(), 1);

        // Losing sync must not reset the fired state...
        f.clock.unsynchronize();
        for _ in 0..5 {
            assert!(f.engine.tick().await.is_empty());
        }
        // ...so regaining it in the same minute does not re-fire.
        f.unit.set_state(PowerState::Off);
        f.clock.set(7, 30);
        assert!(f.engine.tick().await.is_empty());
        assert_eq!(f.unit.presses(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_never_fire_when_clock_never_synchronizes() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 0, 0, 1).await.unwrap();
        for _ in 0..10 {
            assert!(f.engine.tick().await.is_empty());
        }
        assert_eq!(f.unit.presses(), 0);
        assert!(f.journal.read_all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_matching_rules_in_slot_order() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(9, 18, 0, 0).await.unwrap();
        f.store.upsert(2, 18, 0, 1).await.unwrap();
        f.store.upsert(5, 18, 0, 1).await.unwrap();
        f.clock.set(18, 0);

        let fired = f.engine.tick().await;
        let ids: Vec<i64> = fired.iter().map(|firing| i64::from(firing.rule.id)).collect();
        assert_eq!(ids, vec![2, 5, 9]);

        let outcomes: Vec<_> = fired
            .into_iter()
            .map(|firing| firing.result.unwrap())
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ActuationOutcome::Succeeded { attempts: 1 },
                ActuationOutcome::AlreadyThere,
                ActuationOutcome::Succeeded { attempts: 1 },
            ]
        );
        assert_eq!(f.unit.state(), PowerState::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn should_journal_every_fire_including_failures() {
        let f = fixture(PowerState::On).await;
        f.unit.ignore_next_presses(100);
        f.store.upsert(3, 23, 0, 0).await.unwrap();
        f.clock.set(23, 0);

        let fired = f.engine.tick().await;
        assert_eq!(
            fired[0].result.as_ref().unwrap(),
            &ActuationOutcome::Failed { attempts: 5 }
        );
        assert_eq!(
            f.journal.read_all(),
            vec!["[2026-06-01 23:00:00] Schedule #3 (23:00): turn off -> failed to turn off after 5 attempts"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_rules_for_other_minutes() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 7, 30, 1).await.unwrap();
        f.clock.set(8, 30);
        assert!(f.engine.tick().await.is_empty());
        assert_eq!(f.unit.presses(), 0);
        assert!(f.journal.read_all().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_queue_manual_command_behind_scheduled_fire() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 7, 30, 1).await.unwrap();
        f.clock.set(7, 30);
        let control = ControlService::new(
            Arc::clone(&f.actuator),
            Arc::clone(&f.journal),
            Arc::clone(&f.clock),
        );

        let (fired, manual) = tokio::join!(f.engine.tick(), async {
            // Arrives while the scheduled press is held.
            tokio::time::sleep(Duration::from_millis(100)).await;
            control.request_state(PowerState::Off).await
        });

        assert_eq!(
            fired[0].result.as_ref().unwrap(),
            &ActuationOutcome::Succeeded { attempts: 1 }
        );
        assert_eq!(manual.unwrap(), ActuationOutcome::Succeeded { attempts: 1 });
        assert_eq!(f.unit.presses(), 2);
        assert_eq!(f.unit.max_concurrent_presses(), 1);
        assert_eq!(f.unit.state(), PowerState::Off);
        assert_eq!(
            f.journal.read_all(),
            vec![
                "[2026-06-01 07:30:00] Schedule #0 (07:30): turn on -> turned on",
                "[2026-06-01 07:30:00] Manual: turn off -> turned off",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_running_on_shutdown() {
        let f = fixture(PowerState::Off).await;
        f.store.upsert(0, 7, 30, 1).await.unwrap();
        f.clock.set(7, 30);

        f.engine
            .run(
                Duration::from_secs(1),
                tokio::time::sleep(Duration::from_millis(10_500)),
            )
            .await;

        assert_eq!(f.unit.presses(), 1);
        assert_eq!(f.journal.read_all().len(), 1);
    }
}
