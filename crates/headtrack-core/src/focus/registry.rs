//! Side table of focusable targets and their focus levels

use std::collections::BTreeMap;
use std::fmt;

use super::target::{Focusable, TargetId};
use crate::geometry::Point;
use crate::timer::clamp_unit;

/// Answers whether a real interaction at a point would land on a target.
///
/// Used to keep padded hit boxes from reaching through elements that sit on
/// top of the target.
pub trait HitTester {
    fn hits(&self, target: TargetId, point: Point) -> bool;
}

impl<F> HitTester for F
where
    F: Fn(TargetId, Point) -> bool,
{
    fn hits(&self, target: TargetId, point: Point) -> bool {
        self(target, point)
    }
}

struct TargetEntry {
    target: Box<dyn Focusable>,
    focus_level: f32,
    stacking: i64,
}

/// Registered targets keyed by id.
///
/// Iteration is in id order. Each entry also carries a stacking order used by
/// the built-in hit testing: later registrations sit on top unless an explicit
/// order is given.
#[derive(Default)]
pub struct FocusRegistry {
    entries: BTreeMap<TargetId, TargetEntry>,
    next_stacking: i64,
}

impl fmt::Debug for FocusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, e)| (id, e.focus_level)))
            .finish()
    }
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Register a target on top of everything registered so far. Replacing an
    /// existing id keeps its focus level and stacking order.
    pub fn insert(&mut self, id: TargetId, target: Box<dyn Focusable>) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.target = target;
            return;
        }
        let stacking = self.next_stacking;
        self.insert_with_stacking(id, target, stacking);
    }

    /// Register a target with an explicit stacking order (higher is on top)
    pub fn insert_with_stacking(&mut self, id: TargetId, target: Box<dyn Focusable>, stacking: i64) {
        let focus_level = self.focus_level(id);
        self.next_stacking = self.next_stacking.max(stacking.saturating_add(1));
        self.entries.insert(
            id,
            TargetEntry {
                target,
                focus_level,
                stacking,
            },
        );
    }

    pub fn remove(&mut self, id: TargetId) -> Option<Box<dyn Focusable>> {
        self.entries.remove(&id).map(|e| e.target)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the registered set with `targets`.
    ///
    /// Ids no longer present are dropped, known ids get their new target but
    /// keep focus level and stacking, new ids are stacked on top in the order
    /// given.
    pub fn sync<I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = (TargetId, Box<dyn Focusable>)>,
    {
        let mut next = BTreeMap::new();
        for (id, target) in targets {
            let entry = match self.entries.remove(&id) {
                Some(mut existing) => {
                    existing.target = target;
                    existing
                }
                None => {
                    let stacking = self.next_stacking;
                    self.next_stacking = self.next_stacking.saturating_add(1);
                    TargetEntry {
                        target,
                        focus_level: 0.0,
                        stacking,
                    }
                }
            };
            next.insert(id, entry);
        }
        self.entries = next;
    }

    pub fn get(&self, id: TargetId) -> Option<&dyn Focusable> {
        self.entries.get(&id).map(|e| e.target.as_ref())
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut dyn Focusable> {
        self.entries
            .get_mut(&id)
            .map(|e| e.target.as_mut() as &mut dyn Focusable)
    }

    /// Focus level of `id`, 0.0 if unknown
    pub fn focus_level(&self, id: TargetId) -> f32 {
        self.entries.get(&id).map(|e| e.focus_level).unwrap_or(0.0)
    }

    /// Set the focus level of `id`, clamped to `[0, 1]`. Unknown ids are ignored.
    pub fn set_focus_level(&mut self, id: TargetId, level: f32) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.focus_level = clamp_unit(level);
        }
    }

    pub fn reset_focus_levels(&mut self) {
        for entry in self.entries.values_mut() {
            entry.focus_level = 0.0;
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.entries.keys().copied()
    }

    /// Targets in id order
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &dyn Focusable)> + '_ {
        self.entries
            .iter()
            .map(|(id, e)| (*id, e.target.as_ref() as &dyn Focusable))
    }

    /// Apply `f` to every focus level
    pub(crate) fn update_focus_levels<F>(&mut self, mut f: F)
    where
        F: FnMut(TargetId, f32) -> f32,
    {
        for (id, entry) in self.entries.iter_mut() {
            entry.focus_level = clamp_unit(f(*id, entry.focus_level));
        }
    }

    /// Topmost target whose true frame contains `point`
    pub fn topmost_at(&self, point: Point) -> Option<TargetId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.target.frame().contains(point))
            .max_by_key(|(id, e)| (e.stacking, **id))
            .map(|(id, _)| *id)
    }
}

impl HitTester for FocusRegistry {
    fn hits(&self, target: TargetId, point: Point) -> bool {
        self.topmost_at(point) == Some(target)
    }
}
