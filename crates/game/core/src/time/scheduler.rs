//! Clock ownership, day rollovers and block allocation.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::block::{TimeBlock, TimeBlockTemplate};
use super::clock::{Clock, DayOfWeek};
use super::error::AllocationError;
use crate::error::DefinitionError;
use crate::events::{EventSink, ProgressionEvent};
use crate::snapshot::SnapshotError;

/// Starting calendar, daily block layout and activity time costs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimeConfig {
    pub start_day: u32,
    pub start_hour: f32,
    pub start_day_of_week: DayOfWeek,
    pub start_week: u32,
    pub start_month: u32,
    pub start_year: u32,
    /// Daily block layout, scanned in this order.
    pub blocks: Vec<TimeBlockTemplate>,
    /// Hours each activity needs. Activities without an entry always fit.
    pub activity_costs: BTreeMap<String, f32>,
    /// Rebuild blocks when a day boundary is crossed.
    pub reset_blocks_on_day_change: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        let clock = Clock::default();
        Self {
            start_day: clock.day,
            start_hour: clock.hour,
            start_day_of_week: clock.day_of_week,
            start_week: clock.week,
            start_month: clock.month,
            start_year: clock.year,
            blocks: Vec::new(),
            activity_costs: BTreeMap::new(),
            reset_blocks_on_day_change: true,
        }
    }
}

impl TimeConfig {
    fn starting_clock(&self) -> Clock {
        Clock {
            day: self.start_day,
            hour: self.start_hour,
            day_of_week: self.start_day_of_week,
            week: self.start_week,
            month: self.start_month,
            year: self.start_year,
        }
    }
}

/// Clock fields plus the blocks still open for allocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleState {
    pub clock: Clock,
    /// Available blocks that have not started yet, in block order.
    pub available_blocks: Vec<TimeBlock>,
}

/// Persisted form of a [`TimeScheduler`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSnapshot {
    pub clock: Clock,
    pub blocks: Vec<TimeBlock>,
}

/// Owns the calendar clock and the current day's time blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeScheduler {
    clock: Clock,
    blocks: Vec<TimeBlock>,
    activity_costs: BTreeMap<String, f32>,
    reset_blocks_on_day_change: bool,
}

impl TimeScheduler {
    /// Set the starting clock and build the day's blocks from templates.
    pub fn new(config: &TimeConfig) -> Result<Self, DefinitionError> {
        let clock = config.starting_clock();
        clock.validate().map_err(DefinitionError::InvalidClock)?;

        let mut seen = BTreeSet::new();
        for template in &config.blocks {
            if !template.is_well_formed() {
                return Err(DefinitionError::InvalidBlockHours {
                    id: template.id,
                    start: template.start_hour,
                    end: template.end_hour,
                });
            }
            if !seen.insert(template.id) {
                return Err(DefinitionError::DuplicateBlock(template.id));
            }
        }

        Ok(Self {
            clock,
            blocks: config.blocks.iter().map(TimeBlock::from_template).collect(),
            activity_costs: config.activity_costs.clone(),
            reset_blocks_on_day_change: config.reset_blocks_on_day_change,
        })
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn hour(&self) -> f32 {
        self.clock.hour
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn block(&self, block_id: u32) -> Option<&TimeBlock> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Configured time cost of an activity, in hours.
    pub fn time_cost(&self, activity_id: &str) -> Option<f32> {
        self.activity_costs.get(activity_id).copied()
    }

    /// Move the clock forward by `hours`.
    ///
    /// Publishes [`ProgressionEvent::TimeAdvanced`] and, if one or more day
    /// boundaries were crossed, a single [`ProgressionEvent::DayChanged`]
    /// carrying the final day. Negative and non-finite deltas are ignored.
    ///
    /// Returns the number of day boundaries crossed.
    pub fn advance(&mut self, hours: f32, sink: &mut dyn EventSink) -> u32 {
        if !hours.is_finite() || hours < 0.0 {
            warn!(target: "progression::time", hours, "ignoring invalid time advance");
            return 0;
        }

        let days_crossed = self.clock.advance(hours);

        sink.publish(ProgressionEvent::TimeAdvanced {
            hour: self.clock.hour,
            delta: hours,
        });

        if days_crossed > 0 {
            debug!(
                target: "progression::time",
                days_crossed,
                day = self.clock.day,
                day_of_week = %self.clock.day_of_week,
                "day rollover"
            );
            if self.reset_blocks_on_day_change {
                self.reset_blocks();
            }
            sink.publish(ProgressionEvent::DayChanged {
                day: self.clock.day,
                day_of_week: self.clock.day_of_week,
            });
        }

        days_crossed
    }

    /// Mark every block available and clear its activity.
    pub fn reset_blocks(&mut self) {
        for block in &mut self.blocks {
            block.release();
        }
    }

    /// Reserve a block for an activity.
    ///
    /// Fails, leaving the block untouched, when the block is unknown, already
    /// taken, or ended before the current hour.
    pub fn allocate(&mut self, block_id: u32, activity_id: &str) -> Result<(), AllocationError> {
        let hour = self.clock.hour;
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or(AllocationError::UnknownBlock(block_id))?;

        if !block.is_available {
            return Err(AllocationError::Unavailable {
                block: block_id,
                activity: block.allocated_activity.clone().unwrap_or_default(),
            });
        }
        if block.is_elapsed(hour) {
            return Err(AllocationError::Elapsed {
                block: block_id,
                end_hour: block.end_hour,
                hour,
            });
        }

        block.assign(activity_id);
        debug!(
            target: "progression::time",
            block = block_id,
            activity = activity_id,
            "time block allocated"
        );
        Ok(())
    }

    /// Return an allocated block to the free pool. Returns false if the block
    /// is unknown or already free.
    pub fn release(&mut self, block_id: u32) -> bool {
        match self.blocks.iter_mut().find(|b| b.id == block_id) {
            Some(block) if !block.is_available => {
                block.release();
                true
            }
            _ => false,
        }
    }

    /// Whether enough free, upcoming block time remains for the activity.
    ///
    /// Activities without a configured (positive) cost always fit. Otherwise
    /// available blocks starting at or after the current hour are summed in
    /// block order until the running total reaches the cost.
    pub fn has_time_for(&self, activity_id: &str) -> bool {
        let cost = match self.time_cost(activity_id) {
            Some(cost) if cost > 0.0 => cost,
            _ => return true,
        };

        let mut total = 0.0_f32;
        for block in self.upcoming_available() {
            total += block.duration();
            if total >= cost {
                return true;
            }
        }
        false
    }

    pub fn state(&self) -> ScheduleState {
        ScheduleState {
            clock: self.clock,
            available_blocks: self.upcoming_available().cloned().collect(),
        }
    }

    fn upcoming_available(&self) -> impl Iterator<Item = &TimeBlock> + '_ {
        let hour = self.clock.hour;
        self.blocks
            .iter()
            .filter(move |b| b.is_available && b.is_upcoming(hour))
    }

    pub fn snapshot(&self) -> TimeSnapshot {
        TimeSnapshot {
            clock: self.clock,
            blocks: self.blocks.clone(),
        }
    }

    /// Rebuild from a snapshot. Time costs and rollover behaviour are
    /// configuration, so they come from `config` rather than the snapshot.
    pub fn restore(snapshot: TimeSnapshot, config: &TimeConfig) -> Result<Self, SnapshotError> {
        snapshot
            .clock
            .validate()
            .map_err(SnapshotError::InvalidClock)?;

        let mut seen = BTreeSet::new();
        for block in &snapshot.blocks {
            let hours_valid = block.start_hour < block.end_hour && block.end_hour <= 24;
            if !hours_valid || !block.is_consistent() {
                return Err(SnapshotError::InvalidBlock(block.id));
            }
            if !seen.insert(block.id) {
                return Err(SnapshotError::DuplicateBlock(block.id));
            }
        }

        Ok(Self {
            clock: snapshot.clock,
            blocks: snapshot.blocks,
            activity_costs: config.activity_costs.clone(),
            reset_blocks_on_day_change: config.reset_blocks_on_day_change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start_hour: f32) -> TimeConfig {
        TimeConfig {
            start_hour,
            blocks: vec![
                TimeBlockTemplate::new(1, "morning", 6, 10),
                TimeBlockTemplate::new(2, "midday", 10, 14),
                TimeBlockTemplate::new(3, "afternoon", 14, 18),
                TimeBlockTemplate::new(4, "evening", 18, 22),
            ],
            activity_costs: BTreeMap::from([
                ("part_time_job".to_string(), 8.0),
                ("study".to_string(), 4.0),
                ("marathon".to_string(), 20.0),
            ]),
            ..TimeConfig::default()
        }
    }

    fn day_changes(events: &[ProgressionEvent]) -> Vec<&ProgressionEvent> {
        events
            .iter()
            .filter(|e| matches!(e, ProgressionEvent::DayChanged { .. }))
            .collect()
    }

    #[test]
    fn rejects_malformed_templates() {
        let mut bad = config(0.0);
        bad.blocks.push(TimeBlockTemplate::new(9, "broken", 12, 12));
        assert!(matches!(
            TimeScheduler::new(&bad),
            Err(DefinitionError::InvalidBlockHours { id: 9, .. })
        ));

        let mut dup = config(0.0);
        dup.blocks.push(TimeBlockTemplate::new(1, "again", 22, 23));
        assert_eq!(
            TimeScheduler::new(&dup).unwrap_err(),
            DefinitionError::DuplicateBlock(1)
        );
    }

    #[test]
    fn advance_within_a_day_emits_only_time_advanced() {
        let mut scheduler = TimeScheduler::new(&config(8.0)).unwrap();
        let mut events = Vec::new();
        assert_eq!(scheduler.advance(2.5, &mut events), 0);
        assert_eq!(
            events,
            vec![ProgressionEvent::TimeAdvanced {
                hour: 10.5,
                delta: 2.5
            }]
        );
    }

    #[test]
    fn crossing_midnight_advances_day_and_weekday() {
        let mut scheduler = TimeScheduler::new(&config(23.0)).unwrap();
        let mut events = Vec::new();
        scheduler.advance(2.0, &mut events);

        let clock = scheduler.clock();
        assert_eq!((clock.day, clock.hour), (2, 1.0));
        assert_eq!(clock.day_of_week, DayOfWeek::Tuesday);
        assert_eq!(
            day_changes(&events),
            vec![&ProgressionEvent::DayChanged {
                day: 2,
                day_of_week: DayOfWeek::Tuesday
            }]
        );
    }

    #[test]
    fn multi_day_advance_emits_one_day_changed() {
        let mut scheduler = TimeScheduler::new(&config(23.0)).unwrap();
        let mut events = Vec::new();
        assert_eq!(scheduler.advance(26.0, &mut events), 2);

        let clock = scheduler.clock();
        assert_eq!(clock.hour, 1.0);
        assert_eq!(clock.day, 3);
        assert_eq!(
            day_changes(&events),
            vec![&ProgressionEvent::DayChanged {
                day: 3,
                day_of_week: DayOfWeek::Wednesday
            }]
        );
        assert!(matches!(
            events[0],
            ProgressionEvent::TimeAdvanced { delta, .. } if delta == 26.0
        ));
    }

    #[test]
    fn negative_advance_is_ignored() {
        let mut scheduler = TimeScheduler::new(&config(8.0)).unwrap();
        let mut events = Vec::new();
        assert_eq!(scheduler.advance(-3.0, &mut events), 0);
        assert!(events.is_empty());
        assert_eq!(scheduler.hour(), 8.0);
    }

    #[test]
    fn very_long_advance_still_rolls_the_calendar() {
        let mut scheduler = TimeScheduler::new(&config(0.0)).unwrap();
        scheduler.allocate(4, "study").unwrap();
        let mut events = Vec::new();
        let five_hundred_years = 24.0 * 30.0 * 12.0 * 500.0;
        assert_eq!(scheduler.advance(five_hundred_years, &mut events), 180_000);

        assert_eq!(scheduler.clock().year, 501);
        assert_eq!(scheduler.hour(), 0.0);
        assert_eq!(day_changes(&events).len(), 1);
        assert!(scheduler.blocks().iter().all(|b| b.is_available));
    }

    #[test]
    fn allocate_marks_block_and_rejects_repeat() {
        let mut scheduler = TimeScheduler::new(&config(7.0)).unwrap();
        scheduler.allocate(2, "study").expect("free future block");

        let block = scheduler.block(2).unwrap();
        assert!(!block.is_available);
        assert_eq!(block.allocated_activity.as_deref(), Some("study"));

        assert_eq!(
            scheduler.allocate(2, "gym"),
            Err(AllocationError::Unavailable {
                block: 2,
                activity: "study".into()
            })
        );
        assert_eq!(
            scheduler.allocate(42, "gym"),
            Err(AllocationError::UnknownBlock(42))
        );
    }

    #[test]
    fn allocate_past_block_fails_and_leaves_it_unchanged() {
        let mut scheduler = TimeScheduler::new(&config(15.0)).unwrap();
        let before = scheduler.block(1).cloned();

        let err = scheduler.allocate(1, "study").unwrap_err();
        assert!(matches!(err, AllocationError::Elapsed { block: 1, .. }));
        assert_eq!(scheduler.block(1).cloned(), before);
    }

    #[test]
    fn in_progress_block_can_still_be_allocated() {
        let mut scheduler = TimeScheduler::new(&config(11.0)).unwrap();
        assert!(scheduler.allocate(2, "study").is_ok());
    }

    #[test]
    fn has_time_for_accumulates_future_free_blocks() {
        let mut scheduler = TimeScheduler::new(&config(9.0)).unwrap();
        // Upcoming: midday(4) + afternoon(4) + evening(4) = 12 hours.
        assert!(scheduler.has_time_for("part_time_job"));
        assert!(!scheduler.has_time_for("marathon"));
        assert!(scheduler.has_time_for("unconfigured_activity"));

        scheduler.allocate(2, "study").unwrap();
        scheduler.allocate(3, "study").unwrap();
        assert!(!scheduler.has_time_for("part_time_job"));
        assert!(scheduler.has_time_for("study"));
    }

    #[test]
    fn state_lists_only_available_upcoming_blocks() {
        let mut scheduler = TimeScheduler::new(&config(10.0)).unwrap();
        scheduler.allocate(3, "study").unwrap();

        let ids: Vec<u32> = scheduler
            .state()
            .available_blocks
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn day_rollover_resets_blocks() {
        let mut scheduler = TimeScheduler::new(&config(7.0)).unwrap();
        scheduler.allocate(1, "study").unwrap();
        scheduler.allocate(4, "part_time_job").unwrap();

        scheduler.advance(24.0, &mut Vec::new());
        assert!(scheduler.blocks().iter().all(|b| b.is_available));
        assert!(scheduler.blocks().iter().all(|b| b.allocated_activity.is_none()));
    }

    #[test]
    fn release_frees_an_allocated_block() {
        let mut scheduler = TimeScheduler::new(&config(7.0)).unwrap();
        scheduler.allocate(1, "study").unwrap();
        assert!(scheduler.release(1));
        assert!(!scheduler.release(1));
        assert!(scheduler.block(1).unwrap().is_available);
    }

    #[test]
    fn snapshot_round_trip() {
        let cfg = config(7.5);
        let mut scheduler = TimeScheduler::new(&cfg).unwrap();
        scheduler.allocate(3, "study").unwrap();
        scheduler.advance(1.25, &mut Vec::new());

        let snapshot = scheduler.snapshot();
        let restored = TimeScheduler::restore(snapshot.clone(), &cfg).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored, scheduler);
    }

    #[test]
    fn restore_rejects_out_of_range_clock() {
        let cfg = config(0.0);
        let mut snapshot = TimeScheduler::new(&cfg).unwrap().snapshot();
        snapshot.clock.hour = 30.0;
        assert!(matches!(
            TimeScheduler::restore(snapshot, &cfg),
            Err(SnapshotError::InvalidClock(_))
        ));
    }

    #[test]
    fn restore_rejects_contradictory_block_state() {
        let cfg = config(0.0);
        let mut snapshot = TimeScheduler::new(&cfg).unwrap().snapshot();
        snapshot.blocks[1].allocated_activity = Some("study".into());
        assert!(matches!(
            TimeScheduler::restore(snapshot, &cfg),
            Err(SnapshotError::InvalidBlock(2))
        ));

        let mut snapshot = TimeScheduler::new(&cfg).unwrap().snapshot();
        snapshot.blocks[2].is_available = false;
        assert!(matches!(
            TimeScheduler::restore(snapshot, &cfg),
            Err(SnapshotError::InvalidBlock(3))
        ));
    }
}
