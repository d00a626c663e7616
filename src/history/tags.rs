use rustc_hash::FxHashSet;
use std::rc::Rc;

/// A shared handle to an interned tag string
pub type Tag = Rc<str>;

/// De-duplicating pool of tag strings
///
/// Traces routinely repeat the same few call-site labels across millions of
/// events; blocks hold a [`Tag`] handle into this pool instead of their own
/// copy.
#[derive(Debug, Default)]
pub struct TagPool {
    tags: FxHashSet<Tag>,
}

impl TagPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the pooled handle for `text`, adding it on first use
    pub fn intern(&mut self, text: &str) -> Tag {
        if let Some(tag) = self.tags.get(text) {
            return Rc::clone(tag);
        }
        let tag: Tag = Rc::from(text);
        self.tags.insert(Rc::clone(&tag));
        tag
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
