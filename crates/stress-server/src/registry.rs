//! Bookkeeping for started simulations
//!
//! Records what was requested and when; nothing here burns CPU or holds
//! memory. Status is derived on read from the stored timestamps. Finished
//! simulations beyond the retention limit are evicted oldest first;
//! running ones are never evicted.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use serde_json::Value;
use strum::AsRefStr;
use uuid::Uuid;

/// Kind of stress a simulation applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SimulationKind {
    CpuStress,
    MemoryPressure,
    Blocking,
    SlowRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    Running,
    Completed,
    Stopped,
}

/// Snapshot of a simulation as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: SimulationKind,
    pub status: SimulationStatus,
    pub parameters: Value,
    pub started_at: Timestamp,
    /// Absent for simulations that run until stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Started,
    Stopped,
}

/// Entry in the simulation event log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub timestamp: Timestamp,
    pub event: EventKind,
    pub simulation_id: Uuid,
    pub simulation_type: SimulationKind,
    pub message: String,
}

struct Entry {
    kind: SimulationKind,
    parameters: Value,
    started_at: Timestamp,
    ends_at: Option<Timestamp>,
    stopped_at: Option<Timestamp>,
}

impl Entry {
    /// When the simulation stopped or ran out, if it has
    fn finished_at(&self, now: Timestamp) -> Option<Timestamp> {
        self.stopped_at.or(self.ends_at.filter(|end| *end <= now))
    }

    fn snapshot(&self, id: Uuid, now: Timestamp) -> Simulation {
        let status = if self.stopped_at.is_some() {
            SimulationStatus::Stopped
        } else if self.finished_at(now).is_some() {
            SimulationStatus::Completed
        } else {
            SimulationStatus::Running
        };

        Simulation {
            id,
            kind: self.kind,
            status,
            parameters: self.parameters.clone(),
            started_at: self.started_at,
            ends_at: self.ends_at,
            stopped_at: self.stopped_at,
        }
    }
}

/// In-memory simulation registry with a bounded event log
pub struct SimulationRegistry {
    simulations: DashMap<Uuid, Entry>,
    events: Mutex<VecDeque<Event>>,
    event_capacity: usize,
    retained_simulations: usize,
}

impl SimulationRegistry {
    pub fn new(event_capacity: usize, retained_simulations: usize) -> Self {
        Self {
            simulations: DashMap::new(),
            events: Mutex::new(VecDeque::with_capacity(event_capacity)),
            event_capacity,
            retained_simulations,
        }
    }

    pub const fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    /// Register a new running simulation
    ///
    /// `duration_seconds` of `None` means the simulation runs until stopped.
    ///
    /// # Errors
    ///
    /// Fails when the end time falls outside the representable range
    pub fn start(
        &self,
        kind: SimulationKind,
        parameters: Value,
        duration_seconds: Option<u64>,
    ) -> Result<Simulation, jiff::Error> {
        let id = Uuid::new_v4();
        let started_at = Timestamp::now();
        let ends_at = duration_seconds
            .map(|secs| {
                let secs = i64::try_from(secs).unwrap_or(i64::MAX);
                started_at.checked_add(SignedDuration::from_secs(secs))
            })
            .transpose()?;

        let entry = Entry {
            kind,
            parameters,
            started_at,
            ends_at,
            stopped_at: None,
        };
        let simulation = entry.snapshot(id, started_at);
        self.simulations.insert(id, entry);

        tracing::info!(%id, kind = kind.as_ref(), "simulation started");
        self.record(started_at, EventKind::Started, id, kind);
        self.evict_finished(started_at);

        Ok(simulation)
    }

    pub fn get(&self, id: Uuid) -> Option<Simulation> {
        self.simulations
            .get(&id)
            .map(|entry| entry.snapshot(id, Timestamp::now()))
    }

    /// All simulations, newest first
    pub fn list(&self) -> Vec<Simulation> {
        let now = Timestamp::now();
        let mut all: Vec<Simulation> = self
            .simulations
            .iter()
            .map(|entry| entry.value().snapshot(*entry.key(), now))
            .collect();

        all.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        all
    }

    /// Stop a running simulation
    ///
    /// Stopping a simulation that already finished leaves it unchanged.
    /// Returns `None` for unknown ids.
    pub fn stop(&self, id: Uuid) -> Option<Simulation> {
        let now = Timestamp::now();

        let (simulation, changed) = {
            let mut entry = self.simulations.get_mut(&id)?;
            let changed = entry.snapshot(id, now).status == SimulationStatus::Running;
            if changed {
                entry.stopped_at = Some(now);
            }
            (entry.snapshot(id, now), changed)
        };

        if changed {
            tracing::info!(%id, kind = simulation.kind.as_ref(), "simulation stopped");
            self.record(now, EventKind::Stopped, id, simulation.kind);
            self.evict_finished(now);
        }

        Some(simulation)
    }

    /// Number of simulations currently tracked, running or not
    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    /// Drop the oldest finished simulations above the retention limit
    fn evict_finished(&self, now: Timestamp) {
        let mut finished: Vec<(Timestamp, Uuid)> = self
            .simulations
            .iter()
            .filter_map(|entry| Some((entry.value().finished_at(now)?, *entry.key())))
            .collect();

        let Some(excess) = finished.len().checked_sub(self.retained_simulations).filter(|n| *n > 0) else {
            return;
        };

        finished.sort_unstable();
        for (_, id) in finished.into_iter().take(excess) {
            self.simulations.remove(&id);
        }

        tracing::debug!(evicted = excess, "finished simulations evicted");
    }

    /// Most recent events, newest first
    pub fn events(&self, limit: usize) -> Vec<Event> {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.iter().rev().take(limit).cloned().collect()
    }

    fn record(&self, timestamp: Timestamp, event: EventKind, simulation_id: Uuid, kind: SimulationKind) {
        let verb = match event {
            EventKind::Started => "started",
            EventKind::Stopped => "stopped",
        };

        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        if events.len() == self.event_capacity {
            events.pop_front();
        }
        events.push_back(Event {
            timestamp,
            event,
            simulation_id,
            simulation_type: kind,
            message: format!("{} simulation {verb}", kind.as_ref()),
        });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn started_simulation_is_running() {
        let registry = SimulationRegistry::new(10, 100);
        let simulation = registry
            .start(SimulationKind::CpuStress, json!({"targetLoadPercent": 50}), Some(60))
            .unwrap();

        assert_eq!(simulation.status, SimulationStatus::Running);
        assert_eq!(
            simulation.ends_at.unwrap().duration_since(simulation.started_at),
            SignedDuration::from_secs(60)
        );
        assert_eq!(registry.get(simulation.id), Some(simulation));
    }

    #[test]
    fn open_ended_simulation_has_no_end() {
        let registry = SimulationRegistry::new(10, 100);
        let simulation = registry
            .start(SimulationKind::MemoryPressure, json!({"sizeMb": 64}), None)
            .unwrap();

        assert!(simulation.ends_at.is_none());
        let value = serde_json::to_value(&simulation).unwrap();
        assert_eq!(value["type"], "memory_pressure");
        assert!(value.get("endsAt").is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let registry = SimulationRegistry::new(10, 100);
        let id = registry.start(SimulationKind::Blocking, json!({}), Some(30)).unwrap().id;

        let first = registry.stop(id).unwrap();
        assert_eq!(first.status, SimulationStatus::Stopped);

        let second = registry.stop(id).unwrap();
        assert_eq!(second.stopped_at, first.stopped_at);
        assert_eq!(registry.events(10).len(), 2);
    }

    #[test]
    fn unknown_ids_are_absent() {
        let registry = SimulationRegistry::new(10, 100);
        assert!(registry.is_empty());
        assert!(registry.get(Uuid::new_v4()).is_none());
        assert!(registry.stop(Uuid::new_v4()).is_none());
    }

    #[test]
    fn event_log_keeps_most_recent() {
        let registry = SimulationRegistry::new(3, 100);
        let ids: Vec<Uuid> = (0..5)
            .map(|_| registry.start(SimulationKind::SlowRequest, json!({}), Some(1)).unwrap().id)
            .collect();

        let events = registry.events(10);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].simulation_id, ids[4]);
        assert_eq!(events[2].simulation_id, ids[2]);
        assert_eq!(events[0].message, "slow_request simulation started");

        assert_eq!(registry.events(1).len(), 1);
    }

    #[test]
    fn list_is_newest_first() {
        let registry = SimulationRegistry::new(10, 100);
        for _ in 0..3 {
            registry.start(SimulationKind::CpuStress, json!({}), Some(5)).unwrap();
        }

        let all = registry.list();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].started_at >= w[1].started_at));
    }

    #[test]
    fn oversized_duration_is_an_error() {
        let registry = SimulationRegistry::new(10, 100);
        assert!(registry.start(SimulationKind::CpuStress, json!({}), Some(u64::MAX)).is_err());
    }

    #[test]
    fn finished_simulations_are_bounded() {
        let registry = SimulationRegistry::new(3, 5);
        for _ in 0..1000 {
            let id = registry.start(SimulationKind::CpuStress, json!({}), Some(60)).unwrap().id;
            registry.stop(id).unwrap();
        }

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.list().len(), 5);
        assert_eq!(registry.events(10).len(), 3);
    }

    #[test]
    fn running_simulations_survive_eviction() {
        let registry = SimulationRegistry::new(10, 2);
        let running = registry.start(SimulationKind::MemoryPressure, json!({}), None).unwrap().id;

        let mut stopped = Vec::new();
        for _ in 0..4 {
            let id = registry.start(SimulationKind::Blocking, json!({}), Some(30)).unwrap().id;
            registry.stop(id).unwrap();
            stopped.push(id);
        }

        assert_eq!(registry.get(running).unwrap().status, SimulationStatus::Running);
        assert_eq!(stopped.iter().filter(|id| registry.get(**id).is_some()).count(), 2);
        assert_eq!(registry.len(), 3);
    }
}
