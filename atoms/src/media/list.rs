use super::model::{ImageRecord, Sequenced};

/// Ordered collection whose `sequence` values always equal array index.
///
/// Every mutation resequences immediately, so callers never observe gaps or duplicates.
/// Product images and hero slides share these rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

/// A product's images. The record at sequence 0 is the primary image.
pub type ImageList = OrderedList<ImageRecord>;

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Sequenced> OrderedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from stored records: sorted by `sequence` (stable for ties) and then
    /// resequenced densely, so gaps left by older writers disappear.
    pub fn from_records(mut records: Vec<T>) -> Self {
        records.sort_by_key(|r| r.sequence());
        let mut list = Self { items: records };
        list.resequence();
        list
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|r| r.id() == id)
    }

    /// Appends at the end; the record's sequence becomes the previous length.
    pub fn append(&mut self, mut record: T) -> &T {
        let index = self.items.len();
        record.set_sequence(index as u32);
        self.items.push(record);
        &self.items[index]
    }

    /// Removes the record with `id`. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.resequence();
        Some(removed)
    }

    /// Moves the record at `from` to `to`, shifting the records in between.
    ///
    /// Out of range indices and `from == to` leave the list untouched and return `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let record = self.items.remove(from);
        self.items.insert(to, record);
        self.resequence();
        true
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|r| r.id() == id)
    }

    fn resequence(&mut self) {
        for (index, record) in self.items.iter_mut().enumerate() {
            record.set_sequence(index as u32);
        }
    }
}

impl ImageList {
    /// URL of the record at sequence 0, `None` for an empty list. Always derived from the
    /// current order.
    pub fn primary_image_url(&self) -> Option<&str> {
        self.items.first().map(|r| r.url.as_str())
    }

    /// Sets the alt text in place. An empty string clears it.
    pub fn update_alt_text(&mut self, id: &str, text: &str) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                let text = text.trim();
                record.alt_text = (!text.is_empty()).then(|| text.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_active(&mut self, id: &str, is_active: bool) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// Records the storefront may show, in display order.
    pub fn active(&self) -> impl Iterator<Item = &ImageRecord> {
        self.items.iter().filter(|r| r.is_active)
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            url: format!("https://assets.example/{}.png", id),
            alt_text: None,
            sequence: 99,
            is_active: true,
        }
    }

    fn list_of(ids: &[&str]) -> ImageList {
        let mut list = ImageList::new();
        for id in ids {
            list.append(record(id));
        }
        list
    }

    fn ids(list: &ImageList) -> Vec<&str> {
        list.iter().map(|r| r.id.as_str()).collect()
    }

    fn assert_dense(list: &ImageList) {
        let sequences: Vec<u32> = list.iter().map(|r| r.sequence).collect();
        let expected: Vec<u32> = (0..list.len() as u32).collect();
        assert_eq!(sequences, expected);
    }

    #[test]
    fn append_to_empty_list_becomes_primary() {
        let mut list = ImageList::new();
        assert_eq!(list.primary_image_url(), None);

        list.append(record("x"));

        assert_eq!(list.items()[0].sequence, 0);
        assert_eq!(list.primary_image_url(), Some("https://assets.example/x.png"));
    }

    #[test]
    fn remove_middle_record_resequences() {
        let mut list = list_of(&["a", "b", "c"]);

        let removed = list.remove("b");

        assert_eq!(removed.map(|r| r.id), Some("b".to_string()));
        assert_eq!(ids(&list), vec!["a", "c"]);
        assert_dense(&list);
        assert_eq!(list.primary_image_url(), Some("https://assets.example/a.png"));
    }

    #[test]
    fn removing_primary_promotes_next_and_last_removal_clears() {
        let mut list = list_of(&["a", "b"]);

        list.remove("a");
        assert_eq!(list.primary_image_url(), Some("https://assets.example/b.png"));
        assert_dense(&list);

        list.remove("b");
        assert!(list.is_empty());
        assert_eq!(list.primary_image_url(), None);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut list = list_of(&["a", "b"]);
        let before = list.clone();

        assert!(list.remove("zzz").is_none());
        assert_eq!(list, before);
    }

    #[test]
    fn reorder_moves_record_to_front() {
        let mut list = list_of(&["a", "b"]);

        assert!(list.reorder(1, 0));

        assert_eq!(ids(&list), vec!["b", "a"]);
        assert_dense(&list);
        assert_eq!(list.primary_image_url(), Some("https://assets.example/b.png"));
    }

    #[test]
    fn reorder_shifts_intermediate_records() {
        let mut list = list_of(&["a", "b", "c", "d"]);

        list.reorder(0, 2);
        assert_eq!(ids(&list), vec!["b", "c", "a", "d"]);

        list.reorder(3, 1);
        assert_eq!(ids(&list), vec!["b", "d", "c", "a"]);
        assert_dense(&list);
    }

    #[test]
    fn reorder_rejects_same_and_out_of_range_indices() {
        let mut list = list_of(&["a", "b", "c"]);
        let before = list.clone();

        assert!(!list.reorder(1, 1));
        assert!(!list.reorder(3, 0));
        assert!(!list.reorder(0, 3));
        assert_eq!(list, before);
    }

    #[test]
    fn mixed_operations_keep_sequences_dense_and_ids_intact() {
        let mut list = list_of(&["a", "b", "c", "d", "e"]);
        let moves = [(4, 0), (0, 4), (2, 1), (1, 3), (3, 3), (7, 1)];

        for (from, to) in moves {
            list.reorder(from, to);
            assert_dense(&list);
            let mut sorted = ids(&list);
            sorted.sort();
            assert_eq!(sorted, vec!["a", "b", "c", "d", "e"]);
            assert_eq!(
                list.primary_image_url(),
                list.iter().find(|r| r.sequence == 0).map(|r| r.url.as_str())
            );
        }

        list.remove("c");
        list.append(record("f"));
        let first = list.items()[0].id.clone();
        list.remove(&first);
        assert_dense(&list);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn from_records_sorts_and_closes_gaps() {
        let mut b = record("b");
        b.sequence = 7;
        let mut a = record("a");
        a.sequence = 2;
        let mut c = record("c");
        c.sequence = 9;

        let list = ImageList::from_records(vec![c, b, a]);

        assert_eq!(ids(&list), vec!["a", "b", "c"]);
        assert_dense(&list);
    }

    #[test]
    fn alt_text_and_visibility_do_not_touch_order() {
        let mut list = list_of(&["a", "b"]);

        assert!(list.update_alt_text("b", "  Kraft bag  "));
        assert!(list.set_active("a", false));
        assert!(!list.update_alt_text("nope", "x"));

        assert_eq!(ids(&list), vec!["a", "b"]);
        assert_eq!(list.items()[1].alt_text.as_deref(), Some("Kraft bag"));
        assert_eq!(list.active().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["b"]);
        // hidden records still count for the primary slot
        assert_eq!(list.primary_image_url(), Some("https://assets.example/a.png"));

        list.update_alt_text("b", "");
        assert_eq!(list.items()[1].alt_text, None);
    }
}
