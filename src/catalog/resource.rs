//! Bookable resource records.

use qtty::Day;

use crate::interval::Interval;
use crate::policy::OverlapPolicy;
use crate::timeline::Timeline;
use crate::EntityId;

/// Capacity model of a resource.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Capacity {
    /// Interval-exclusive (a room): at most one active allocation per
    /// instant, availability answered by the timeline.
    Exclusive {
        /// Price per whole day of stay.
        rate: f64,
        timeline: Timeline<Day>,
    },
    /// Countable (a book title with N copies): checkout is immediate, no
    /// interval math. Invariant: `available <= total`.
    Countable { total: u32, available: u32 },
}

/// A bookable resource: identity, catalog key (room type or ISBN-equivalent),
/// display name, and capacity model.
///
/// Construction and mutation go through the [`Catalog`](super::Catalog) and
/// the desk; outside the crate the record is read-only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    id: EntityId,
    key: String,
    name: String,
    capacity: Capacity,
}

impl Resource {
    pub(crate) fn new(id: EntityId, key: String, name: String, capacity: Capacity) -> Self {
        Self {
            id,
            key,
            name,
            capacity,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Catalog key requests are matched against: room type for exclusive
    /// resources, ISBN-equivalent for countable ones.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    /// Nightly rate for exclusive resources.
    pub fn rate(&self) -> Option<f64> {
        match self.capacity {
            Capacity::Exclusive { rate, .. } => Some(rate),
            Capacity::Countable { .. } => None,
        }
    }

    /// Remaining copies for countable resources.
    pub fn available(&self) -> Option<u32> {
        match self.capacity {
            Capacity::Countable { available, .. } => Some(available),
            Capacity::Exclusive { .. } => None,
        }
    }

    /// Whether the resource can satisfy a request over `interval`.
    ///
    /// Pure query, no side effects. Exclusive resources consult their
    /// timeline; countable ones only need a remaining copy. NaN endpoints
    /// are treated as not free (the desk rejects them earlier).
    pub fn is_free(&self, interval: Interval<Day>) -> bool {
        match &self.capacity {
            Capacity::Exclusive { timeline, .. } => {
                timeline.is_free(interval).unwrap_or(false)
            }
            Capacity::Countable { available, .. } => *available > 0,
        }
    }

    pub(crate) fn timeline_mut(&mut self) -> Option<&mut Timeline<Day>> {
        match &mut self.capacity {
            Capacity::Exclusive { timeline, .. } => Some(timeline),
            Capacity::Countable { .. } => None,
        }
    }

    /// Takes one copy. Returns false (and changes nothing) when none remain.
    pub(crate) fn checkout_copy(&mut self) -> bool {
        match &mut self.capacity {
            Capacity::Countable { available, .. } if *available > 0 => {
                *available -= 1;
                true
            }
            _ => false,
        }
    }

    /// Returns one copy, never exceeding `total`.
    pub(crate) fn restore_copy(&mut self) {
        if let Capacity::Countable { total, available } = &mut self.capacity {
            if *available < *total {
                *available += 1;
            }
        }
    }

    pub(crate) fn set_overlap_policy(&mut self, policy: OverlapPolicy) {
        if let Capacity::Exclusive { timeline, .. } = &mut self.capacity {
            if timeline.is_empty() && timeline.policy() != policy {
                *timeline = Timeline::with_policy(policy);
            }
        }
    }
}

// A hand-edited snapshot must not smuggle in `available > total`; validate
// on the way in, like `Interval` does for its endpoints.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Capacity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        enum Raw {
            Exclusive { rate: f64, timeline: Timeline<Day> },
            Countable { total: u32, available: u32 },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Countable { total, available } if available > total => Err(
                serde::de::Error::custom("countable capacity: available exceeds total"),
            ),
            Raw::Countable { total, available } => Ok(Capacity::Countable { total, available }),
            Raw::Exclusive { rate, timeline } => Ok(Capacity::Exclusive { rate, timeline }),
        }
    }
}
