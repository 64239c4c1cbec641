//! Shared name-to-value storage that aliases bind into.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::errors::{AliasError, ErrorInfo};
use crate::value::Value;

/// Handle to a shared mapping from identifiers to values.
///
/// Cloning a `Scope` yields another handle to the same storage. The mapping is
/// single threaded; callers that need to share it across threads must provide
/// their own synchronization around a different storage type.
///
/// Aliases hold strong handles, so a slot storing an alias bound back into
/// the same scope forms a reference cycle until that slot is removed.
#[derive(Clone, Default)]
pub struct Scope {
    slots: Rc<RefCell<BTreeMap<String, Value>>>,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, returning the previously bound value.
    pub fn insert(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.slots.borrow_mut().insert(name.into(), value.into())
    }

    /// Returns a copy of the value bound to `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.slots.borrow().get(name).cloned()
    }

    /// Returns whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    /// Removes the binding for `name`.
    ///
    /// Aliases bound to a removed name fail with `NameNotFound` on access.
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.slots.borrow_mut().remove(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Returns whether the scope holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Bound names in ascending order.
    pub fn names(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }

    /// Returns an ordered copy of every binding.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.slots.borrow().clone()
    }

    /// Returns whether both handles refer to the same storage.
    pub fn same_as(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.slots, &other.slots)
    }

    /// Serializes the current bindings to pretty JSON.
    pub fn to_json(&self) -> Result<String, AliasError> {
        serde_json::to_string_pretty(&*self.slots.borrow())
            .map_err(|err| AliasError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
    }

    /// Builds a fresh scope from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, AliasError> {
        let slots: BTreeMap<String, Value> = serde_json::from_str(json)
            .map_err(|err| AliasError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
        Ok(Self::from(slots))
    }

    pub(crate) fn read<R>(&self, name: &str, f: impl FnOnce(&Value) -> R) -> Result<R, AliasError> {
        let slots = self.slots.borrow();
        slots
            .get(name)
            .map(f)
            .ok_or_else(|| AliasError::name_not_found(name))
    }

    pub(crate) fn write<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Value) -> R,
    ) -> Result<R, AliasError> {
        let mut slots = self.slots.borrow_mut();
        slots
            .get_mut(name)
            .map(f)
            .ok_or_else(|| AliasError::name_not_found(name))
    }

    /// First name, in ascending order, whose slot satisfies `predicate`.
    pub(crate) fn find(&self, predicate: impl Fn(&Value) -> bool) -> Option<String> {
        self.slots
            .borrow()
            .iter()
            .find(|(_, value)| predicate(value))
            .map(|(name, _)| name.clone())
    }
}

impl From<BTreeMap<String, Value>> for Scope {
    fn from(slots: BTreeMap<String, Value>) -> Self {
        Self {
            slots: Rc::new(RefCell::new(slots)),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let slots = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect::<BTreeMap<_, _>>();
        Self::from(slots)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Slot values may hold aliases back into this scope.
        f.debug_struct("Scope")
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}
