//! Menu descriptors declared by rating types.
//!
//! Pure metadata for a UI layer: the aggregator exposes the collected
//! [`MenuRegistry`] but never interprets it while scoring.

use ttime_config::SettingsKey;

use crate::registry::RatingRegistry;

/// A UI action exposed by a rating type.
///
/// # Example
///
/// ```
/// use ttime_ratings::MenuItem;
///
/// let item = MenuItem::with_event("Ignore gaps on this day", "ignore_day");
/// assert!(item.event_required);
/// assert_eq!(item.action, "ignore_day");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuItem {
    /// Display text.
    pub caption: String,
    /// Name of the action passed to [`Rating::perform_action`](crate::Rating::perform_action).
    pub action: String,
    /// Whether an event must be selected to run the action.
    pub event_required: bool,
}

impl MenuItem {
    /// Creates an item that needs no selected event.
    pub fn new(caption: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            action: action.into(),
            event_required: false,
        }
    }

    /// Creates an item that acts on the selected event.
    pub fn with_event(caption: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            event_required: true,
            ..Self::new(caption, action)
        }
    }
}

/// Menu items of every registered rating type, grouped by settings key.
#[derive(Debug, Clone, Default)]
pub struct MenuRegistry {
    entries: Vec<(SettingsKey, Vec<MenuItem>)>,
}

impl MenuRegistry {
    /// Creates an empty menu registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the menu items declared by every type in `registry`.
    ///
    /// Types declaring no items are left out.
    pub fn from_registry(registry: &RatingRegistry) -> Self {
        let entries = registry
            .list_registered_types()
            .filter(|d| !d.menu_items.is_empty())
            .map(|d| (d.settings_key.clone(), d.menu_items.clone()))
            .collect();
        Self { entries }
    }

    /// Returns the items declared for `key`.
    pub fn items_for(&self, key: &str) -> &[MenuItem] {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    /// Finds the item of `key` that triggers `action`.
    pub fn find(&self, key: &str, action: &str) -> Option<&MenuItem> {
        self.items_for(key).iter().find(|item| item.action == action)
    }

    /// Iterates over every item together with its rating's settings key.
    pub fn iter(&self) -> impl Iterator<Item = (&SettingsKey, &MenuItem)> {
        self.entries
            .iter()
            .flat_map(|(key, items)| items.iter().map(move |item| (key, item)))
    }

    /// Returns the total number of items.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, items)| items.len()).sum()
    }

    /// Returns true if no rating declares menu items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
