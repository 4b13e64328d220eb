//! Iteration engine
//!
//! Drives per-element work over a sequence that the work itself may shrink.
//! The loop is flat: each step asks the [`Cursor`] for the next index, and the
//! cursor re-reads the sequence length every time. A worker that removes the
//! current element calls [`Cursor::step_back`] so the element that slid into
//! its slot is visited next.
//!
//! The same cursor drives [`run_in_series`], which runs asynchronous phases
//! one after another. Because neither loop recurses, stack depth does not grow
//! with the number of elements or with how many steps completed without
//! suspending.

use futures::future::BoxFuture;
use indexmap::IndexSet;
use std::ops::ControlFlow;

// ============================================================================
// SEQUENCE
// ============================================================================

/// A dense, index-addressable collection.
pub trait Sequence {
    /// Current number of elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Sequence for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

impl<T> Sequence for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Visited in insertion order.
impl<T, S> Sequence for IndexSet<T, S> {
    fn len(&self) -> usize {
        IndexSet::len(self)
    }
}

impl<S: Sequence + ?Sized> Sequence for &S {
    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<S: Sequence + ?Sized> Sequence for &mut S {
    fn len(&self) -> usize {
        (**self).len()
    }
}

// ============================================================================
// CURSOR
// ============================================================================

/// Resumable position of an iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    next: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns the index to visit next, or `None` once `len` is reached.
    ///
    /// `len` is taken fresh on every call so removals made by the previous
    /// step are observed.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if self.next < len {
            let index = self.next;
            self.next += 1;
            Some(index)
        } else {
            None
        }
    }

    /// Revisits the index returned by the last [`advance`](Self::advance).
    pub fn step_back(&mut self) {
        self.next = self.next.saturating_sub(1);
    }

    /// Index the next [`advance`](Self::advance) will return.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.next
    }
}

// ============================================================================
// DRIVERS
// ============================================================================

/// Calls `worker` for each index of `seq` in order.
///
/// A worker returning [`ControlFlow::Break`] stops the iteration and its
/// payload is returned. The worker gets mutable access to both the sequence
/// and the cursor so it can remove the current element and step back.
pub fn iterate<S, B, F>(mut seq: S, mut worker: F) -> ControlFlow<B>
where
    S: Sequence,
    F: FnMut(&mut S, usize, &mut Cursor) -> ControlFlow<B>,
{
    let mut cursor = Cursor::new();
    while let Some(index) = cursor.advance(seq.len()) {
        worker(&mut seq, index, &mut cursor)?;
    }
    ControlFlow::Continue(())
}

/// An asynchronous step over a shared context.
pub type Task<C, B> = for<'a> fn(&'a mut C) -> BoxFuture<'a, ControlFlow<B>>;

/// Runs `tasks` strictly one after another.
///
/// The first [`ControlFlow::Break`] skips the remaining tasks and is returned.
pub async fn run_in_series<C, B>(ctx: &mut C, tasks: &[Task<C, B>]) -> ControlFlow<B>
where
    C: ?Sized + Send,
{
    let mut cursor = Cursor::new();
    while let Some(index) = cursor.advance(tasks.len()) {
        (tasks[index])(ctx).await?;
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn visits_in_order() {
        let items = vec![1, 2, 3];
        let mut seen = Vec::new();
        let flow: ControlFlow<()> = iterate(&items, |seq, i, _| {
            seen.push(seq[i]);
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let items: Vec<u8> = Vec::new();
        let flow: ControlFlow<&str> = iterate(&items, |_, _, _| ControlFlow::Break("called"));
        assert_eq!(flow, ControlFlow::Continue(()));
    }

    #[test]
    fn break_carries_payload() {
        let items = [10, 20, 30];
        let flow = iterate(&items[..], |seq, i, _| {
            if seq[i] == 20 {
                ControlFlow::Break(i)
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(1));
    }

    #[test]
    fn removal_with_step_back_visits_every_element() {
        let mut items = vec![1, 0, 0, 2, 0, 3];
        let mut visits = 0;
        let flow: ControlFlow<()> = iterate(&mut items, |seq, i, cursor| {
            visits += 1;
            if seq[i] == 0 {
                seq.remove(i);
                cursor.step_back();
            }
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(visits, 6);
    }

    #[test]
    fn index_set_visits_insertion_order() {
        let set: IndexSet<&str> = ["b", "a", "c"].into_iter().collect();
        let mut seen = Vec::new();
        let _: ControlFlow<()> = iterate(&set, |seq, i, _| {
            seen.push(seq[i]);
            ControlFlow::Continue(())
        });
        assert_eq!(seen, vec!["b", "a", "c"]);
    }

    #[test]
    fn deep_iteration_does_not_grow_stack() {
        let items = vec![0u8; 1_000_000];
        let mut count = 0usize;
        let _: ControlFlow<()> = iterate(&items, |_, _, _| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(count, 1_000_000);
    }

    fn push_one(log: &mut Vec<u8>) -> BoxFuture<'_, ControlFlow<u8>> {
        async move {
            log.push(1);
            ControlFlow::Continue(())
        }
        .boxed()
    }

    fn stop(log: &mut Vec<u8>) -> BoxFuture<'_, ControlFlow<u8>> {
        async move {
            log.push(2);
            ControlFlow::Break(7)
        }
        .boxed()
    }

    #[test]
    fn series_short_circuits() {
        let mut log = Vec::new();
        let tasks: [Task<Vec<u8>, u8>; 3] = [push_one, stop, push_one];
        let flow = futures::executor::block_on(run_in_series(&mut log, &tasks));
        assert_eq!(flow, ControlFlow::Break(7));
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    fn series_runs_all_tasks() {
        let mut log = Vec::new();
        let tasks: [Task<Vec<u8>, u8>; 2] = [push_one, push_one];
        let flow = futures::executor::block_on(run_in_series(&mut log, &tasks));
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(log, vec![1, 1]);
    }
}
