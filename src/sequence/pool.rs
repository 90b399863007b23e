use deckhand_wire::SlideModel;

use super::editor::SlideSequence;

/// A slide as the sequence sees it: an identifier plus a thumbnail
/// reference that is carried along but never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub id: String,
    pub thumbnail: Option<String>,
}

impl Slide {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thumbnail: None,
        }
    }
}

impl From<SlideModel> for Slide {
    fn from(model: SlideModel) -> Self {
        Self {
            id: model.id,
            thumbnail: (!model.thumbnail.is_empty()).then_some(model.thumbnail),
        }
    }
}

impl SlideSequence<Slide> {
    /// Removes every occurrence of the slide with `id`.
    pub fn remove_slide(&mut self, id: &str) -> usize {
        self.remove_where(|slide| slide.id == id)
    }
}

/// Slides available for assembly and the user's current pick, kept in the
/// order they were clicked.
#[derive(Debug, Clone, Default)]
pub struct SlidePool<T> {
    items: Vec<T>,
    selection: Vec<usize>,
}

impl<T> SlidePool<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            selection: Vec::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Flips the selection of `items[index]`. Returns whether it is now
    /// selected; unknown indices are never selected.
    pub fn toggle_selected(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        if let Some(pos) = self.selection.iter().position(|&i| i == index) {
            self.selection.remove(pos);
            false
        } else {
            self.selection.push(index);
            true
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    pub fn selected(&self) -> Vec<&T> {
        self.selection.iter().map(|&i| &self.items[i]).collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Appends the whole pool to `sequence`, in pool order.
    pub fn add_all_to(&self, sequence: &mut SlideSequence<T>)
    where
        T: Clone,
    {
        sequence.insert_some(&self.items);
    }

    /// Appends the selected slides in click order and clears the
    /// selection. Returns how many were added.
    pub fn add_selected_to(&mut self, sequence: &mut SlideSequence<T>) -> usize
    where
        T: Clone,
    {
        let picked: Vec<T> = self.selected().into_iter().cloned().collect();
        let count = picked.len();
        sequence.insert_all(picked);
        self.clear_selection();
        count
    }
}
