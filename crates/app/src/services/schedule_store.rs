//! Schedule store — the 16-slot rule table and its durable mirror.
//!
//! Each slot is persisted as four integer keys in the `schedules`
//! namespace: `slot{i}.occupied`, `slot{i}.hour`, `slot{i}.minute` and
//! `slot{i}.target`. On upsert the rule fields are written first and the
//! occupancy flag last, so an interrupted write never leaves a slot looking
//! occupied with a mix of old and new fields. Replacing an occupied slot
//! clears its flag before touching the fields.
//!
//! The in-memory table mirrors the durable copy. If a replacement fails
//! after the flag was cleared, the slot is empty in both.

use tokio::sync::Mutex;

use acctl_domain::error::{AcCtlError, NotFoundError};
use acctl_domain::power::PowerState;
use acctl_domain::schedule::{ClockTime, ScheduleRule, ScheduleTable, SlotId};

use crate::ports::KeyValueStore;

/// Namespace holding the schedule keys.
pub const SCHEDULE_NAMESPACE: &str = "schedules";

fn slot_key(id: SlotId, field: &str) -> String {
    format!("slot{id}.{field}")
}

/// Owns the schedule table and keeps it in sync with durable storage.
pub struct ScheduleStore<K> {
    kv: K,
    table: Mutex<ScheduleTable>,
}

impl<K: KeyValueStore> ScheduleStore<K> {
    /// Load every slot from durable storage.
    ///
    /// A slot that cannot be read, or holds out-of-range values, is treated
    /// as unoccupied and a warning is logged.
    pub async fn load(kv: K) -> Self {
        let mut table = ScheduleTable::default();
        for id in SlotId::all() {
            match Self::load_slot(&kv, id).await {
                Ok(Some(rule)) => table.insert(rule),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(slot = %id, error = %err, "ignoring unreadable schedule slot");
                }
            }
        }
        tracing::info!(rules = table.occupied().count(), "schedules loaded");
        Self {
            kv,
            table: Mutex::new(table),
        }
    }

    async fn load_slot(kv: &K, id: SlotId) -> Result<Option<ScheduleRule>, AcCtlError> {
        let occupied = kv
            .get(SCHEDULE_NAMESPACE, &slot_key(id, "occupied"))
            .await?
            .unwrap_or(0);
        if occupied == 0 {
            return Ok(None);
        }
        let hour = kv
            .get(SCHEDULE_NAMESPACE, &slot_key(id, "hour"))
            .await?
            .unwrap_or(0);
        let minute = kv
            .get(SCHEDULE_NAMESPACE, &slot_key(id, "minute"))
            .await?
            .unwrap_or(0);
        let target = kv
            .get(SCHEDULE_NAMESPACE, &slot_key(id, "target"))
            .await?
            .unwrap_or(0);

        let time = ClockTime::new(hour, minute)?;
        let target = PowerState::try_from(target)?;
        Ok(Some(ScheduleRule::new(id, time, target)))
    }

    /// Create or replace the rule in slot `id`.
    ///
    /// All arguments are validated before anything is written. The rule
    /// starts idle, so it may fire in the current minute.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Validation`] for an out-of-range argument, or
    /// [`AcCtlError::Storage`] if persisting fails. The slot then keeps its
    /// previous rule if nothing was written yet, and is empty otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn upsert(
        &self,
        id: i64,
        hour: i64,
        minute: i64,
        target: i64,
    ) -> Result<ScheduleRule, AcCtlError> {
        let id = SlotId::try_from(id)?;
        let time = ClockTime::new(hour, minute)?;
        let target = PowerState::try_from(target)?;
        let rule = ScheduleRule::new(id, time, target);

        let mut table = self.table.lock().await;
        if table.is_occupied(id) {
            self.put(id, "occupied", 0).await?;
            table.remove(id);
        }
        self.put(id, "hour", i64::from(time.hour())).await?;
        self.put(id, "minute", i64::from(time.minute())).await?;
        self.put(id, "target", target.as_flag()).await?;
        self.put(id, "occupied", 1).await?;
        table.insert(rule.clone());

        tracing::info!(slot = %id, time = %time, %target, "schedule saved");
        Ok(rule)
    }

    /// Empty slot `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AcCtlError::Validation`] for an out-of-range id,
    /// [`AcCtlError::NotFound`] if the slot is empty, or
    /// [`AcCtlError::Storage`] if persisting fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AcCtlError> {
        let id = SlotId::try_from(id)?;

        let mut table = self.table.lock().await;
        if !table.is_occupied(id) {
            return Err(NotFoundError {
                entity: "Schedule",
                id: id.to_string(),
            }
            .into());
        }
        self.put(id, "occupied", 0).await?;
        table.remove(id);

        tracing::info!(slot = %id, "schedule deleted");
        Ok(())
    }

    /// Occupied rules in ascending slot order.
    pub async fn snapshot(&self) -> Vec<ScheduleRule> {
        self.table.lock().await.occupied().cloned().collect()
    }

    /// Advance every rule's firing state for the observed time and return
    /// the rules that became due, in slot order.
    pub async fn observe(&self, now: ClockTime) -> Vec<ScheduleRule> {
        self.table.lock().await.observe(now)
    }

    async fn put(&self, id: SlotId, field: &str, value: i64) -> Result<(), AcCtlError> {
        self.kv
            .put(SCHEDULE_NAMESPACE, &slot_key(id, field), value)
            .await
            .inspect_err(|err| {
                tracing::error!(slot = %id, field, error = %err, "failed to persist schedule");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryKv;
    use acctl_domain::error::ValidationError;
    use std::sync::Arc;

    async fn empty_store() -> (Arc<InMemoryKv>, ScheduleStore<Arc<InMemoryKv>>) {
        let kv = Arc::new(InMemoryKv::default());
        let store = ScheduleStore::load(Arc::clone(&kv)).await;
        (kv, store)
    }

    fn at(hour: i64, minute: i64) -> ClockTime {
        ClockTime::new(hour, minute).unwrap()
    }

    #[tokio::test]
    async fn should_start_empty_without_stored_slots() {
        let (_, store) = empty_store().await;
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn should_persist_all_fields_on_upsert() {
        let (kv, store) = empty_store().await;
        store.upsert(4, 7, 45, 1).await.unwrap();

        assert_eq!(kv.value(SCHEDULE_NAMESPACE, "slot4.occupied"), Some(1));
        assert_eq!(kv.value(SCHEDULE_NAMESPACE, "slot4.hour"), Some(7));
        assert_eq!(kv.value(SCHEDULE_NAMESPACE, "slot4.minute"), Some(45));
        assert_eq!(kv.value(SCHEDULE_NAMESPACE, "slot4.target"), Some(1));
    }

    #[tokio::test]
    async fn should_overwrite_rule_on_second_upsert() {
        let (_, store) = empty_store().await;
        store.upsert(2, 6, 0, 1).await.unwrap();
        store.upsert(2, 22, 15, 0).await.unwrap();

        let rules = store.snapshot().await;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, SlotId::try_from(2).unwrap());
        assert_eq!(rules[0].time, at(22, 15));
        assert_eq!(rules[0].target, PowerState::Off);
    }

    #[tokio::test]
    async fn should_reject_out_of_range_slot_without_touching_others() {
        let (kv, store) = empty_store().await;
        store.upsert(0, 8, 0, 1).await.unwrap();
        let puts_before = kv.puts();

        for id in [16, -1] {
            let result = store.upsert(id, 9, 0, 0).await;
            assert!(matches!(
                result,
                Err(AcCtlError::Validation(ValidationError::SlotOutOfRange(v))) if v == id
            ));
        }

        assert_eq!(kv.puts(), puts_before);
        let rules = store.snapshot().await;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].time, at(8, 0));
    }

    #[tokio::test]
    async fn should_reject_invalid_time_and_target() {
        let (_, store) = empty_store().await;
        assert!(matches!(
            store.upsert(1, 24, 0, 1).await,
            Err(AcCtlError::Validation(ValidationError::HourOutOfRange(24)))
        ));
        assert!(matches!(
            store.upsert(1, 8, 60, 1).await,
            Err(AcCtlError::Validation(ValidationError::MinuteOutOfRange(60)))
        ));
        assert!(matches!(
            store.upsert(1, 8, 0, 2).await,
            Err(AcCtlError::Validation(ValidationError::InvalidTarget(2)))
        ));
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn should_delete_then_report_not_found() {
        let (kv, store) = empty_store().await;
        store.upsert(3, 12, 0, 0).await.unwrap();

        store.delete(3).await.unwrap();
        assert!(store.snapshot().await.is_empty());
        assert_eq!(kv.value(SCHEDULE_NAMESPACE, "slot3.occupied"), Some(0));

        assert!(matches!(
            store.delete(3).await,
            Err(AcCtlError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_reject_delete_of_out_of_range_slot() {
        let (_, store) = empty_store().await;
        assert!(matches!(
            store.delete(99).await,
            Err(AcCtlError::Validation(ValidationError::SlotOutOfRange(99)))
        ));
    }

    #[tokio::test]
    async fn should_surface_write_failure_and_keep_memory_unchanged() {
        let (kv, store) = empty_store().await;
        store.upsert(1, 8, 0, 1).await.unwrap();
        kv.fail_writes(true);

        assert!(matches!(
            store.upsert(1, 9, 30, 0).await,
            Err(AcCtlError::Storage(_))
        ));
        assert!(matches!(store.delete(1).await, Err(AcCtlError::Storage(_))));

        let rules = store.snapshot().await;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].time, at(8, 0));
    }

    #[tokio::test]
    async fn should_keep_durable_copy_in_step_when_replacement_fails_midway() {
        let (kv, store) = empty_store().await;
        store.upsert(1, 8, 0, 1).await.unwrap();

        // Clear flag, hour and minute succeed; the target write fails.
        kv.fail_writes_after(3);
        assert!(matches!(
            store.upsert(1, 21, 30, 0).await,
            Err(AcCtlError::Storage(_))
        ));
        assert!(store.snapshot().await.is_empty());

        let reloaded = ScheduleStore::load(Arc::clone(&kv)).await;
        assert!(reloaded.snapshot().await.is_empty());
        assert_eq!(kv.value(SCHEDULE_NAMESPACE, "slot1.occupied"), Some(0));
    }

    #[tokio::test]
    async fn should_keep_previous_rule_when_first_write_fails() {
        let (kv, store) = empty_store().await;
        store.upsert(1, 8, 0, 1).await.unwrap();

        kv.fail_writes_after(0);
        assert!(store.upsert(1, 21, 30, 0).await.is_err());

        let reloaded = ScheduleStore::load(Arc::clone(&kv)).await;
        for rules in [store.snapshot().await, reloaded.snapshot().await] {
            assert_eq!(rules.len(), 1);
            assert_eq!(rules[0].time, at(8, 0));
            assert_eq!(rules[0].target, PowerState::On);
        }
    }

    #[tokio::test]
    async fn should_reload_persisted_rules() {
        let kv = Arc::new(InMemoryKv::default());
        {
            let store = ScheduleStore::load(Arc::clone(&kv)).await;
            store.upsert(0, 6, 30, 1).await.unwrap();
            store.upsert(15, 23, 0, 0).await.unwrap();
            store.upsert(7, 12, 0, 1).await.unwrap();
            store.delete(7).await.unwrap();
        }

        let reloaded = ScheduleStore::load(kv).await;
        let rules = reloaded.snapshot().await;
        let ids: Vec<i64> = rules.iter().map(|r| i64::from(r.id)).collect();
        assert_eq!(ids, vec![0, 15]);
        assert_eq!(rules[1].target, PowerState::Off);
    }

    #[tokio::test]
    async fn should_treat_corrupt_slot_as_unoccupied() {
        let kv = Arc::new(InMemoryKv::default());
        kv.put(SCHEDULE_NAMESPACE, "slot5.occupied", 1).await.unwrap();
        kv.put(SCHEDULE_NAMESPACE, "slot5.hour", 31).await.unwrap();

        let store = ScheduleStore::load(kv).await;
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn should_fire_once_per_minute_and_rearm_after_upsert() {
        let (_, store) = empty_store().await;
        store.upsert(0, 8, 0, 1).await.unwrap();

        assert_eq!(store.observe(at(8, 0)).await.len(), 1);
        assert!(store.observe(at(8, 0)).await.is_empty());

        store.upsert(0, 8, 0, 0).await.unwrap();
        assert_eq!(store.observe(at(8, 0)).await.len(), 1);
    }
}
