use anyhow::{Result, anyhow};
use tracing::debug;

/// Moves `items[source]` so it sits before the item currently at gap
/// `gap`, where gaps run over `0..=items.len()`.
///
/// Returns the index the item ends up at. Both gaps adjacent to the source
/// leave the slice untouched. Callers check `source < len` and
/// `gap <= len`.
pub fn move_to_gap<T>(items: &mut [T], source: usize, gap: usize) -> usize {
    if gap > source {
        // Removing the source shifts everything after it left by one
        items[source..gap].rotate_left(1);
        gap - 1
    } else {
        items[gap..=source].rotate_right(1);
        gap
    }
}

/// In-flight drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub source: usize,
    /// Gap under the pointer, for highlighting
    pub hover_gap: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { from: usize, to: usize },
    /// Dropped on a gap next to the source
    Unchanged,
    /// No drag was in progress
    NoDrag,
    /// The source or gap no longer fits the sequence
    OutOfRange,
}

/// Ordered, user-reorderable list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSequence<T> {
    items: Vec<T>,
    drag: Option<DragState>,
}

impl<T> Default for SlideSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for SlideSequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, drag: None }
    }
}

impl<T> SlideSequence<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            drag: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }

    /// Starts a drag from `source`. A second call replaces the first.
    pub fn begin_drag(&mut self, source: usize) {
        self.drag = Some(DragState {
            source,
            hover_gap: None,
        });
    }

    pub fn drag_over(&mut self, gap: usize) {
        if let Some(drag) = self.drag.as_mut() {
            drag.hover_gap = Some(gap);
        }
    }

    /// Ends the gesture without a drop.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Completes the drag at gap `gap`. The drag is cleared whatever the
    /// outcome.
    pub fn drop_at(&mut self, gap: usize) -> DropOutcome {
        let Some(drag) = self.drag.take() else {
            return DropOutcome::NoDrag;
        };

        let source = drag.source;
        if source >= self.items.len() || gap > self.items.len() {
            debug!(source, gap, len = self.items.len(), "Drop outside the sequence ignored");
            return DropOutcome::OutOfRange;
        }
        if gap == source || gap == source + 1 {
            return DropOutcome::Unchanged;
        }

        let to = move_to_gap(&mut self.items, source, gap);
        DropOutcome::Moved { from: source, to }
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(anyhow!("Index out of bounds"));
        }
        let item = self.items.remove(index);
        self.shift_drag_after_removal(&[index]);
        Ok(item)
    }

    /// Removes every item matching `pred`, returning how many went.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut index = 0;
        self.items.retain(|item| {
            let keep = !pred(item);
            if !keep {
                removed.push(index);
            }
            index += 1;
            keep
        });
        self.shift_drag_after_removal(&removed);
        removed.len()
    }

    pub fn insert_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
    }

    /// Appends copies of `items`, leaving the source intact.
    pub fn insert_some(&mut self, items: &[T])
    where
        T: Clone,
    {
        self.items.extend_from_slice(items);
    }

    /// Keeps a recorded drag source pointing at the same item after the
    /// items at `removed` (ascending) were deleted.
    fn shift_drag_after_removal(&mut self, removed: &[usize]) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if removed.contains(&drag.source) {
            self.drag = None;
            return;
        }
        let below = removed.iter().filter(|&&index| index < drag.source).count();
        drag.source -= below;
        drag.hover_gap = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seq(n: usize) -> SlideSequence<String> {
        SlideSequence::from((0..n).map(|i| format!("s{}", i)).collect::<Vec<_>>())
    }

    fn names(seq: &SlideSequence<String>) -> Vec<&str> {
        seq.items().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_move_forward_to_later_gap() {
        let mut seq = seq(4);
        seq.begin_drag(0);
        assert_eq!(seq.drop_at(3), DropOutcome::Moved { from: 0, to: 2 });
        assert_eq!(names(&seq), vec!["s1", "s2", "s0", "s3"]);
        assert_eq!(seq.drag(), None);
    }

    #[test]
    fn test_move_last_to_front() {
        let mut seq = seq(3);
        seq.begin_drag(2);
        assert_eq!(seq.drop_at(0), DropOutcome::Moved { from: 2, to: 0 });
        assert_eq!(names(&seq), vec!["s2", "s0", "s1"]);
    }

    #[test]
    fn test_append_at_end_gap() {
        let mut seq = seq(3);
        seq.begin_drag(0);
        assert_eq!(seq.drop_at(3), DropOutcome::Moved { from: 0, to: 2 });
        assert_eq!(names(&seq), vec!["s1", "s2", "s0"]);
    }

    #[test]
    fn test_adjacent_gaps_are_noops() {
        for source in 0..4 {
            for gap in [source, source + 1] {
                let mut seq = seq(4);
                seq.begin_drag(source);
                assert_eq!(seq.drop_at(gap), DropOutcome::Unchanged);
                assert_eq!(seq, self::seq(4));
            }
        }
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let mut seq = seq(3);
        assert_eq!(seq.drop_at(0), DropOutcome::NoDrag);
        assert_eq!(names(&seq), vec!["s0", "s1", "s2"]);

        seq.begin_drag(1);
        seq.cancel_drag();
        assert_eq!(seq.drop_at(0), DropOutcome::NoDrag);
    }

    #[test]
    fn test_out_of_range_drop_clears_drag() {
        let mut seq = seq(3);
        seq.begin_drag(1);
        assert_eq!(seq.drop_at(4), DropOutcome::OutOfRange);
        assert_eq!(seq.drag(), None);

        seq.begin_drag(7);
        assert_eq!(seq.drop_at(0), DropOutcome::OutOfRange);
        assert_eq!(names(&seq), vec!["s0", "s1", "s2"]);
    }

    #[test]
    fn test_second_begin_wins() {
        let mut seq = seq(3);
        seq.begin_drag(0);
        seq.drag_over(2);
        seq.begin_drag(2);
        assert_eq!(
            seq.drag(),
            Some(DragState {
                source: 2,
                hover_gap: None
            })
        );
        seq.drop_at(0);
        assert_eq!(names(&seq), vec!["s2", "s0", "s1"]);
    }

    #[test]
    fn test_drag_over_requires_drag() {
        let mut seq = seq(2);
        seq.drag_over(1);
        assert_eq!(seq.drag(), None);

        seq.begin_drag(0);
        seq.drag_over(2);
        assert_eq!(seq.drag().and_then(|d| d.hover_gap), Some(2));
    }

    /// Every (source, gap) pair against a plain remove-then-insert.
    #[test]
    fn test_drop_matches_remove_insert_for_all_pairs() {
        for n in 1..=6 {
            for source in 0..n {
                for gap in 0..=n {
                    let before = seq(n);
                    let mut seq = before.clone();
                    seq.begin_drag(source);
                    seq.drop_at(gap);

                    let mut expected = before.clone().into_vec();
                    let item = expected.remove(source);
                    let insert_at = if gap > source { gap - 1 } else { gap };
                    expected.insert(insert_at, item.clone());
                    assert_eq!(
                        seq.items(),
                        expected.as_slice(),
                        "n={n} source={source} gap={gap}"
                    );

                    // Moved item sits right before the occupant of the gap
                    let result = seq.items();
                    let pos = result.iter().position(|s| *s == item).unwrap();
                    if gap < n && gap != source {
                        assert_eq!(result[pos + 1], before.items()[gap]);
                    } else if gap == n {
                        assert_eq!(pos, n - 1);
                    }

                    // Everything else keeps its relative order
                    let others: Vec<_> = result.iter().filter(|s| **s != item).collect();
                    let before_others: Vec<_> =
                        before.items().iter().filter(|s| **s != item).collect();
                    assert_eq!(others, before_others);
                }
            }
        }
    }

    #[test]
    fn test_move_to_gap_returns_final_index() {
        let mut items = vec![1, 2, 3, 4, 5];
        assert_eq!(move_to_gap(&mut items, 1, 4), 3);
        assert_eq!(items, vec![1, 3, 4, 2, 5]);
        assert_eq!(move_to_gap(&mut items, 4, 1), 1);
        assert_eq!(items, vec![1, 5, 3, 4, 2]);
    }

    #[test]
    fn test_duplicates_are_moved_by_position() {
        let mut seq = SlideSequence::from(vec!["a", "b", "a"]);
        seq.begin_drag(2);
        seq.drop_at(1);
        assert_eq!(seq.items(), &["a", "a", "b"]);
    }

    #[test]
    fn test_remove_at() {
        let mut seq = seq(3);
        assert_eq!(seq.remove_at(1).unwrap(), "s1");
        assert_eq!(names(&seq), vec!["s0", "s2"]);
        assert!(seq.remove_at(2).is_err());
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_remove_below_source_shifts_drag() {
        let mut seq = seq(4);
        seq.begin_drag(3);
        seq.remove_at(0).unwrap();
        assert_eq!(seq.drag().map(|d| d.source), Some(2));

        // Source still refers to s3
        seq.drop_at(0);
        assert_eq!(names(&seq), vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn test_remove_source_clears_drag() {
        let mut seq = seq(3);
        seq.begin_drag(1);
        seq.remove_at(1).unwrap();
        assert_eq!(seq.drag(), None);
    }

    #[test]
    fn test_remove_where() {
        let mut seq = SlideSequence::from(vec!["a", "b", "a", "c"]);
        seq.begin_drag(3);
        assert_eq!(seq.remove_where(|s| *s == "a"), 2);
        assert_eq!(seq.items(), &["b", "c"]);
        assert_eq!(seq.drag().map(|d| d.source), Some(1));
        assert_eq!(seq.remove_where(|s| *s == "z"), 0);
    }

    #[test]
    fn test_bulk_insert_preserves_order() {
        let mut seq = SlideSequence::new();
        seq.insert_all(vec!["a".to_string(), "b".to_string()]);
        let more = vec!["c".to_string(), "d".to_string()];
        seq.insert_some(&more);
        assert_eq!(names(&seq), vec!["a", "b", "c", "d"]);
        assert_eq!(more.len(), 2);
    }
}
