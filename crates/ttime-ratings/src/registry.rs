//! Rating registry.
//!
//! Rating types register themselves with a typed constructor instead of being
//! looked up by name at runtime. The registry then produces one
//! [`RatingInstance`] per type.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ttime_config::{ConfigError, SettingsKey, SettingsStore, Value};

use crate::error::{ConstructionError, RatingError};
use crate::instance::RatingInstance;
use crate::menu::{MenuItem, MenuRegistry};
use crate::rating::{Rating, RatingType};

type Constructor = fn() -> Result<Box<dyn Rating>, RatingError>;

fn construct<R: RatingType>() -> Result<Box<dyn Rating>, RatingError> {
    R::create().map(|rating| Box::new(rating) as Box<dyn Rating>)
}

/// Describes a registered rating type at runtime.
pub struct RatingDescriptor {
    /// Full name of the rating type.
    pub type_name: &'static str,
    /// TypeId of the rating type.
    pub type_id: TypeId,
    /// Resolved settings key.
    pub settings_key: SettingsKey,
    /// Menu items declared by the type.
    pub menu_items: Vec<MenuItem>,
    default_settings: fn() -> Option<Value>,
    constructor: Constructor,
}

impl RatingDescriptor {
    /// Builds the descriptor of `R`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnresolvedSettingsKey`] if neither the declared
    /// key nor the type name yields a usable key.
    pub fn of<R: RatingType>() -> Result<Self, ConfigError> {
        Ok(Self {
            type_name: std::any::type_name::<R>(),
            type_id: TypeId::of::<R>(),
            settings_key: SettingsKey::resolve::<R>(R::settings_key())?,
            menu_items: R::menu_items(),
            default_settings: R::default_settings,
            constructor: construct::<R>,
        })
    }

    /// Returns the declared default settings.
    pub fn default_settings(&self) -> Option<Value> {
        (self.default_settings)()
    }

    pub(crate) fn default_settings_fn(&self) -> fn() -> Option<Value> {
        self.default_settings
    }

    /// Constructs a new instance bound to `store`.
    pub fn instantiate(&self, store: Arc<SettingsStore>) -> Result<RatingInstance, ConstructionError> {
        match (self.constructor)() {
            Ok(rating) => Ok(RatingInstance::new(self, store, rating)),
            Err(source) => Err(ConstructionError {
                key: self.settings_key.clone(),
                type_name: self.type_name,
                source,
            }),
        }
    }
}

impl fmt::Debug for RatingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatingDescriptor")
            .field("type_name", &self.type_name)
            .field("settings_key", &self.settings_key)
            .field("menu_items", &self.menu_items.len())
            .finish()
    }
}

/// Every rating type known to the process.
#[derive(Debug, Default)]
pub struct RatingRegistry {
    descriptors: Vec<RatingDescriptor>,
    type_index: HashMap<TypeId, usize>,
    key_index: HashMap<SettingsKey, usize>,
}

impl RatingRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers rating type `R`.
    ///
    /// Returns `false` if `R` was already registered.
    ///
    /// # Errors
    ///
    /// Fails if the settings key cannot be resolved or is already taken by
    /// another type.
    pub fn register<R: RatingType>(&mut self) -> Result<bool, ConfigError> {
        if self.type_index.contains_key(&TypeId::of::<R>()) {
            return Ok(false);
        }
        self.register_descriptor(RatingDescriptor::of::<R>()?)
    }

    /// Registers a prepared descriptor, see [`register`](Self::register).
    pub fn register_descriptor(&mut self, descriptor: RatingDescriptor) -> Result<bool, ConfigError> {
        if self.type_index.contains_key(&descriptor.type_id) {
            return Ok(false);
        }
        if let Some(&existing) = self.key_index.get(&descriptor.settings_key) {
            return Err(ConfigError::DuplicateSettingsKey {
                key: descriptor.settings_key.to_string(),
                existing: self.descriptors[existing].type_name.to_string(),
                duplicate: descriptor.type_name.to_string(),
            });
        }

        let index = self.descriptors.len();
        self.type_index.insert(descriptor.type_id, index);
        self.key_index.insert(descriptor.settings_key.clone(), index);
        self.descriptors.push(descriptor);
        Ok(true)
    }

    /// Returns every registered rating type, in registration order.
    pub fn list_registered_types(&self) -> impl Iterator<Item = &RatingDescriptor> {
        self.descriptors.iter()
    }

    /// Finds a descriptor by settings key.
    pub fn find(&self, key: &str) -> Option<&RatingDescriptor> {
        self.key_index.get(key).map(|&idx| &self.descriptors[idx])
    }

    /// Returns true if `R` is registered.
    pub fn contains<R: RatingType>(&self) -> bool {
        self.type_index.contains_key(&TypeId::of::<R>())
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Constructs one instance of every registered type.
    ///
    /// A failed construction is reported in place and does not stop the
    /// remaining types; an empty result means nothing is registered.
    pub fn instantiate_all(
        &self,
        store: &Arc<SettingsStore>,
    ) -> Vec<Result<RatingInstance, ConstructionError>> {
        self.descriptors
            .iter()
            .map(|d| d.instantiate(Arc::clone(store)))
            .collect()
    }

    /// Collects the menu items of every registered type.
    pub fn menu(&self) -> MenuRegistry {
        MenuRegistry::from_registry(self)
    }
}
