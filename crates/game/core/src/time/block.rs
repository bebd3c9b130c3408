//! Allocatable hour slots within a day.

/// Configured shape of a block, used to build each day's slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBlockTemplate {
    pub id: u32,
    pub label: String,
    pub start_hour: u8,
    pub end_hour: u8,
}

impl TimeBlockTemplate {
    pub fn new(id: u32, label: impl Into<String>, start_hour: u8, end_hour: u8) -> Self {
        Self {
            id,
            label: label.into(),
            start_hour,
            end_hour,
        }
    }

    /// `start < end <= 24`.
    pub fn is_well_formed(&self) -> bool {
        self.start_hour < self.end_hour && self.end_hour <= 24
    }
}

/// One half-open `[start_hour, end_hour)` slot of the current day.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBlock {
    pub id: u32,
    pub label: String,
    pub start_hour: u8,
    pub end_hour: u8,
    pub is_available: bool,
    /// Activity holding the block; `None` while it is free.
    pub allocated_activity: Option<String>,
}

impl TimeBlock {
    pub fn from_template(template: &TimeBlockTemplate) -> Self {
        Self {
            id: template.id,
            label: template.label.clone(),
            start_hour: template.start_hour,
            end_hour: template.end_hour,
            is_available: true,
            allocated_activity: None,
        }
    }

    /// Length of the block in hours.
    pub fn duration(&self) -> f32 {
        f32::from(self.end_hour.saturating_sub(self.start_hour))
    }

    /// True when the block has not started by `hour`.
    pub fn is_upcoming(&self, hour: f32) -> bool {
        f32::from(self.start_hour) >= hour
    }

    /// True when the block ended before `hour`.
    pub fn is_elapsed(&self, hour: f32) -> bool {
        f32::from(self.end_hour) < hour
    }

    /// Availability and the activity agree: free blocks hold no activity and
    /// taken blocks hold one.
    pub fn is_consistent(&self) -> bool {
        self.is_available == self.allocated_activity.is_none()
    }

    pub(crate) fn assign(&mut self, activity_id: &str) {
        self.is_available = false;
        self.allocated_activity = Some(activity_id.to_string());
    }

    pub(crate) fn release(&mut self) {
        self.is_available = true;
        self.allocated_activity = None;
    }
}
