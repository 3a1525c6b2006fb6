use crate::interval::Interval;
use crate::policy::OverlapPolicy;
use crate::Code;
use std::collections::{BTreeMap, HashMap};
pub mod entry_key;
pub mod errors;
use entry_key::*;
use errors::*;


/// Availability index for one exclusive resource: the set of active
/// allocation intervals, sorted by start time and guaranteed conflict-free
/// under the timeline's overlap policy.
///
/// # Internal Structure
/// - `by_start`: `BTreeMap` from start time to entry
/// - `start_by_code`: `HashMap` from allocation code to start time
///
/// # Complexity
/// - `add`: O(log n) with O(1) neighbor conflict checks
/// - `remove`: O(log n)
/// - `is_free` / `conflicts`: O(log n + k) where k is the number of conflicts
///
/// # Examples
///
/// ```
/// use reserva::timeline::Timeline;
/// use reserva::interval::Interval;
/// use qtty::Day;
///
/// let mut timeline = Timeline::<Day>::new();
///
/// timeline.add("R-1", Interval::from_f64(0.0, 3.0)).unwrap();
/// timeline.add("R-2", Interval::from_f64(5.0, 8.0)).unwrap();
///
/// // Day 4 is free, day 1–6 conflicts with both stays.
/// assert!(timeline.is_free(Interval::from_f64(3.5, 4.5)).unwrap());
/// let conflicts = timeline.conflicts_vec(Interval::from_f64(1.0, 6.0)).unwrap();
/// assert_eq!(conflicts.len(), 2);
///
/// // Releasing a slot frees it again.
/// timeline.remove("R-1");
/// assert!(timeline.is_free(Interval::from_f64(0.0, 3.0)).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Timeline<U: qtty::Unit> {
    policy: OverlapPolicy,
    by_start: BTreeMap<TimeKey, Entry<U>>,
    start_by_code: HashMap<Code, TimeKey>,
}

impl<U: qtty::Unit> Default for Timeline<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: qtty::Unit> Timeline<U> {
    /// Empty timeline with the closed-interval overlap policy.
    pub fn new() -> Self {
        Self::with_policy(OverlapPolicy::Closed)
    }

    pub fn with_policy(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            by_start: BTreeMap::new(),
            start_by_code: HashMap::new(),
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    fn key(q: qtty::Quantity<U>) -> Result<TimeKey, TimelineError> {
        let v = q.value();
        if v.is_nan() {
            Err(TimelineError::NaNTime)
        } else {
            Ok(TimeKey(v))
        }
    }

    /// Returns true if an allocation with this code holds a slot.
    pub fn contains_code(&self, code: &str) -> bool {
        self.start_by_code.contains_key(code)
    }

    /// Gets the interval held by an allocation code (if present).
    pub fn get_interval(&self, code: &str) -> Option<Interval<U>> {
        let start = self.start_by_code.get(code)?;
        self.by_start.get(start).map(|e| e.interval)
    }

    /// Registers an active allocation interval.
    ///
    /// Requires:
    /// - `code` not already present
    /// - interval times not NaN
    /// - interval does not conflict with any existing interval under the
    ///   timeline's overlap policy
    ///
    /// Only the predecessor and successor need checking because the timeline
    /// is maintained conflict-free and sorted by start time.
    pub fn add(&mut self, code: impl Into<Code>, interval: Interval<U>) -> Result<(), TimelineError> {
        let code: Code = code.into();
        if self.contains_code(&code) {
            return Err(TimelineError::DuplicateCode(code));
        }

        let start_k = Self::key(interval.start())?;
        Self::key(interval.end())?;

        // Start keys are unique: a second slot at the same start would
        // overwrite the first in `by_start` and orphan its code. This can
        // only be reached under half-open policy with a zero-width neighbor.
        if let Some(existing) = self.by_start.get(&start_k) {
            return Err(TimelineError::OverlapsExisting {
                new_code: code,
                existing_code: existing.code.clone(),
            });
        }

        // Predecessor: latest interval with start <= new.start.
        if let Some((_k, prev)) = self.by_start.range(..=start_k).next_back() {
            if prev.interval.conflicts_with(&interval, self.policy) {
                return Err(TimelineError::OverlapsExisting {
                    new_code: code,
                    existing_code: prev.code.clone(),
                });
            }
        }

        // Successor: earliest interval with start >= new.start.
        if let Some((_k, next)) = self.by_start.range(start_k..).next() {
            if next.interval.conflicts_with(&interval, self.policy) {
                return Err(TimelineError::OverlapsExisting {
                    new_code: code,
                    existing_code: next.code.clone(),
                });
            }
        }

        self.by_start.insert(start_k, Entry::new(code.clone(), interval));
        self.start_by_code.insert(code, start_k);
        Ok(())
    }

    /// Releases the slot held by an allocation. Returns its interval if it
    /// existed.
    pub fn remove(&mut self, code: &str) -> Option<Interval<U>> {
        let start_k = self.start_by_code.remove(code)?;
        let entry = self.by_start.remove(&start_k)?;
        Some(entry.interval)
    }

    /// Returns true if `query` conflicts with any active allocation.
    pub fn has_conflict(&self, query: Interval<U>) -> Result<bool, TimelineError> {
        Ok(self.conflicts(query)?.next().is_some())
    }

    /// Iterates over all active allocations conflicting with `query`.
    ///
    /// Complexity: O(log n + k) where k is the number of conflicts.
    pub fn conflicts<'a>(
        &'a self,
        query: Interval<U>,
    ) -> Result<impl Iterator<Item = (Code, Interval<U>)> + 'a, TimelineError> {
        let q_start_k = Self::key(query.start())?;
        let q_end = query.end().value();
        if q_end.is_nan() {
            return Err(TimelineError::NaNTime);
        }

        // The predecessor of q_start may start before the query but still
        // reach into it; begin the scan there when it conflicts.
        let range_start = match self.by_start.range(..=q_start_k).next_back() {
            Some((k, prev)) if prev.interval.conflicts_with(&query, self.policy) => *k,
            _ => q_start_k,
        };

        let policy = self.policy;
        let iter = self
            .by_start
            .range(range_start..)
            .take_while(move |(k, _e)| k.0 <= q_end)
            .filter(move |(_k, e)| e.interval.conflicts_with(&query, policy))
            .map(|(_k, e)| (e.code.clone(), e.interval));

        Ok(iter)
    }

    /// Convenience: returns conflicts collected into a Vec.
    pub fn conflicts_vec(
        &self,
        query: Interval<U>,
    ) -> Result<Vec<(Code, Interval<U>)>, TimelineError> {
        Ok(self.conflicts(query)?.collect())
    }

    /// Checks whether the resource is free over `query`.
    pub fn is_free(&self, query: Interval<U>) -> Result<bool, TimelineError> {
        Ok(!self.has_conflict(query)?)
    }

    /// Returns an iterator over all active slots in start time order.
    ///
    /// Each item is `(code, interval)`.
    pub fn iter(&self) -> impl Iterator<Item = (Code, Interval<U>)> + '_ {
        self.by_start.values().map(|e| (e.code.clone(), e.interval))
    }

    /// Clears all slots from the timeline.
    pub fn clear(&mut self) {
        self.by_start.clear();
        self.start_by_code.clear();
    }
}

// =============================================================================
// Timeline Serde Support
// =============================================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeSeq, SerializeStruct};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::marker::PhantomData;

    struct SlotOut<'a, U: qtty::Unit> {
        code: &'a str,
        interval: &'a Interval<U>,
    }

    impl<U: qtty::Unit> Serialize for SlotOut<'_, U> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut s = serializer.serialize_struct("Slot", 2)?;
            s.serialize_field("code", self.code)?;
            s.serialize_field("interval", self.interval)?;
            s.end()
        }
    }

    struct SlotsOut<'a, U: qtty::Unit>(&'a Timeline<U>);

    impl<U: qtty::Unit> Serialize for SlotsOut<'_, U> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
            for (code, interval) in self.0.iter() {
                seq.serialize_element(&SlotOut {
                    code: &code,
                    interval: &interval,
                })?;
            }
            seq.end()
        }
    }

    impl<U: qtty::Unit> Serialize for Timeline<U> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut s = serializer.serialize_struct("Timeline", 2)?;
            s.serialize_field("policy", &self.policy)?;
            s.serialize_field("slots", &SlotsOut(self))?;
            s.end()
        }
    }

    struct SlotIn<U: qtty::Unit> {
        code: Code,
        interval: Interval<U>,
    }

    impl<'de, U: qtty::Unit> Deserialize<'de> for SlotIn<U> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct SlotVisitor<U: qtty::Unit>(PhantomData<U>);

            impl<'de, U: qtty::Unit> Visitor<'de> for SlotVisitor<U> {
                type Value = SlotIn<U>;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a slot object with 'code' and 'interval' fields")
                }

                fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut code: Option<Code> = None;
                    let mut interval: Option<Interval<U>> = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "code" => {
                                if code.is_some() {
                                    return Err(de::Error::duplicate_field("code"));
                                }
                                code = Some(map.next_value()?);
                            }
                            "interval" => {
                                if interval.is_some() {
                                    return Err(de::Error::duplicate_field("interval"));
                                }
                                interval = Some(map.next_value()?);
                            }
                            _ => {
                                let _ = map.next_value::<de::IgnoredAny>()?;
                            }
                        }
                    }

                    let code = code.ok_or_else(|| de::Error::missing_field("code"))?;
                    let interval =
                        interval.ok_or_else(|| de::Error::missing_field("interval"))?;

                    Ok(SlotIn { code, interval })
                }
            }

            deserializer.deserialize_map(SlotVisitor(PhantomData))
        }
    }

    impl<'de, U: qtty::Unit> Deserialize<'de> for Timeline<U> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct TimelineVisitor<U: qtty::Unit>(PhantomData<U>);

            impl<'de, U: qtty::Unit> Visitor<'de> for TimelineVisitor<U> {
                type Value = Timeline<U>;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a timeline object with 'policy' and 'slots' fields")
                }

                fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut policy: Option<OverlapPolicy> = None;
                    let mut slots: Option<Vec<SlotIn<U>>> = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "policy" => {
                                if policy.is_some() {
                                    return Err(de::Error::duplicate_field("policy"));
                                }
                                policy = Some(map.next_value()?);
                            }
                            "slots" => {
                                if slots.is_some() {
                                    return Err(de::Error::duplicate_field("slots"));
                                }
                                slots = Some(map.next_value()?);
                            }
                            _ => {
                                let _ = map.next_value::<de::IgnoredAny>()?;
                            }
                        }
                    }

                    let mut timeline =
                        Timeline::with_policy(policy.unwrap_or(OverlapPolicy::Closed));
                    for slot in slots.unwrap_or_default() {
                        timeline
                            .add(slot.code, slot.interval)
                            .map_err(de::Error::custom)?;
                    }
                    Ok(timeline)
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    // Bare sequence form: slots only, default policy.
                    let mut timeline = Timeline::new();
                    while let Some(slot) = seq.next_element::<SlotIn<U>>()? {
                        timeline
                            .add(slot.code, slot.interval)
                            .map_err(de::Error::custom)?;
                    }
                    Ok(timeline)
                }
            }

            deserializer.deserialize_any(TimelineVisitor(PhantomData))
        }
    }
}
