//! Per-action single-flight tokens.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// One in-flight flag per action plus a count of everything running.
///
/// The count backs the view's loading indicator; it only drops when a
/// [`FlightGuard`] is dropped, so it is cleared on every exit path.
pub struct FlightSlots<const N: usize> {
    slots: [AtomicBool; N],
    active: AtomicUsize,
}

impl<const N: usize> FlightSlots<N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| AtomicBool::new(false)),
            active: AtomicUsize::new(0),
        }
    }

    /// Claim slot `index`, or `None` if that action is already running.
    pub fn try_begin(&self, index: usize) -> Option<FlightGuard<'_>> {
        let slot = &self.slots[index];
        slot.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.active.fetch_add(1, Ordering::AcqRel);
        Some(FlightGuard {
            slot,
            active: &self.active,
        })
    }

    pub fn is_running(&self, index: usize) -> bool {
        self.slots[index].load(Ordering::Acquire)
    }

    /// Whether any action is running.
    pub fn any_running(&self) -> bool {
        self.active.load(Ordering::Acquire) > 0
    }
}

impl<const N: usize> Default for FlightSlots<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases its slot on drop.
pub struct FlightGuard<'a> {
    slot: &'a AtomicBool,
    active: &'a AtomicUsize,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
        self.slot.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let slots = FlightSlots::<2>::new();
        let guard = slots.try_begin(0).unwrap();
        assert!(slots.try_begin(0).is_none());
        assert!(slots.is_running(0));
        drop(guard);
        assert!(!slots.is_running(0));
        assert!(slots.try_begin(0).is_some());
    }

    #[test]
    fn slots_are_independent() {
        let slots = FlightSlots::<2>::new();
        let _a = slots.try_begin(0).unwrap();
        assert!(slots.try_begin(1).is_some());
    }

    #[test]
    fn loading_clears_when_all_guards_drop() {
        let slots = FlightSlots::<3>::new();
        assert!(!slots.any_running());
        let a = slots.try_begin(0).unwrap();
        let b = slots.try_begin(2).unwrap();
        drop(a);
        assert!(slots.any_running());
        drop(b);
        assert!(!slots.any_running());
    }
}
