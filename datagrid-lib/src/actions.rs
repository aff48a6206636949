//! Action cell dispatch.
//!
//! One handler per action class for the lifetime of a grid. Registration
//! happens once at construction; rebuilding the tree never re-registers.

use std::collections::HashMap;
use std::fmt;

use crate::column::{ActionCallback, Column};

#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionCallback>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated from every action column that carries a callback.
    /// The first column of a class wins.
    pub fn from_columns(columns: &[Column]) -> Self {
        let mut registry = Self::new();
        for column in columns {
            if let (Some(class), Some(callback)) = (&column.action_class, &column.action_callback) {
                registry.register_once(class, callback.clone());
            }
        }
        registry
    }

    /// Registers `callback` for `class` unless one is already present.
    /// Returns whether it was registered.
    pub fn register_once(&mut self, class: &str, callback: ActionCallback) -> bool {
        if self.handlers.contains_key(class) {
            return false;
        }
        log::debug!("[actions] registered handler for {class}");
        self.handlers.insert(class.to_string(), callback);
        true
    }

    /// Invokes the handler for `class`. Returns whether one existed.
    pub fn dispatch(&self, class: &str, value: &str) -> bool {
        match self.handlers.get(class) {
            Some(handler) => {
                handler(value);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.handlers.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&String> = self.handlers.keys().collect();
        classes.sort();
        f.debug_struct("ActionRegistry")
            .field("classes", &classes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::column::ColumnSpec;

    #[test]
    fn test_one_handler_per_class() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let spec = ColumnSpec::field("id")
            .action("Edit", "edit-row", "id")
            .on_action(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let columns = vec![Column::resolve(&spec), Column::resolve(&spec)];

        let registry = ActionRegistry::from_columns(&columns);
        assert_eq!(registry.len(), 1);

        assert!(registry.dispatch("edit-row", "7"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!registry.dispatch("delete-row", "7"));
    }

    #[test]
    fn test_register_once_keeps_first() {
        let mut registry = ActionRegistry::new();
        assert!(registry.register_once("a", Arc::new(|_| {})));
        assert!(!registry.register_once("a", Arc::new(|_| {})));
        assert!(registry.contains("a"));
    }
}
