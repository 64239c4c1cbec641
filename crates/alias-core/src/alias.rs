//! The [`Alias`] handle: a named slot plus an index, emulating a C pointer.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Sub};
use std::rc::Rc;

use log::{debug, trace};

use crate::errors::{AliasError, ErrorInfo};
use crate::key::{Key, Slice};
use crate::scope::Scope;
use crate::value::Value;

const DETACHED_LABEL: &str = "(detached)";

/// Storage an alias points into.
#[derive(Clone)]
enum Target {
    /// Private single-value cell for raw or unnamed values.
    Detached(Rc<RefCell<Value>>),
    /// Named slot of an externally owned scope.
    Bound { scope: Scope, name: String },
}

/// Capability set of an alias, derived from the value currently in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    /// The slot holds [`Value::None`].
    Empty,
    /// The slot holds a non-sequence value; only position 0 is addressable.
    Scalar,
    /// The slot holds a list; the index selects an element.
    Sequence,
    /// The slot holds another alias.
    Chained,
}

impl AliasKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::None => AliasKind::Empty,
            Value::List(_) => AliasKind::Sequence,
            Value::Alias(_) => AliasKind::Chained,
            _ => AliasKind::Scalar,
        }
    }
}

/// Reference to a storage slot, optionally into a position of a list value.
///
/// Two aliases observe each other's writes iff they share a slot: the same
/// scope and binding name, or the same detached cell. Copies made with
/// [`Alias::duplicate`] or [`Alias::offset`] share the slot but carry their
/// own index.
#[derive(Clone)]
pub struct Alias {
    target: Target,
    index: i64,
}

impl Alias {
    /// Creates an empty alias holding [`Value::None`] in a private cell.
    pub fn empty() -> Self {
        Self::detached(Value::None)
    }

    /// Creates an alias over a raw value that no other alias can see.
    pub fn detached(value: impl Into<Value>) -> Self {
        Self {
            target: Target::Detached(Rc::new(RefCell::new(value.into()))),
            index: 0,
        }
    }

    /// Binds to `name` in `scope` at index 0.
    pub fn bind(scope: &Scope, name: &str) -> Result<Self, AliasError> {
        Self::bind_at(scope, name, 0)
    }

    /// Binds to `name` in `scope` at the given index.
    pub fn bind_at(scope: &Scope, name: &str, index: i64) -> Result<Self, AliasError> {
        if !scope.contains(name) {
            return Err(AliasError::name_not_found(name));
        }
        debug!("binding alias to `{name}` at index {index}");
        Ok(Self {
            target: Target::Bound {
                scope: scope.clone(),
                name: name.to_owned(),
            },
            index,
        })
    }

    /// Starts a builder mirroring the full `(value, name, index, scope)` constructor.
    pub fn builder() -> AliasBuilder {
        AliasBuilder::default()
    }

    /// Current index.
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Moves the index without touching the slot.
    pub fn set_index(&mut self, index: i64) {
        self.index = index;
    }

    /// Binding name, or `None` for detached aliases.
    pub fn name(&self) -> Option<&str> {
        match &self.target {
            Target::Detached(_) => None,
            Target::Bound { name, .. } => Some(name),
        }
    }

    /// Scope the alias is bound into, or `None` for detached aliases.
    pub fn scope(&self) -> Option<&Scope> {
        match &self.target {
            Target::Detached(_) => None,
            Target::Bound { scope, .. } => Some(scope),
        }
    }

    /// Returns whether the alias owns a private cell.
    pub fn is_detached(&self) -> bool {
        matches!(self.target, Target::Detached(_))
    }

    /// Returns whether the slot currently holds [`Value::None`].
    pub fn is_null(&self) -> bool {
        matches!(self.kind(), Ok(AliasKind::Empty))
    }

    /// Capability set of the value currently in the slot.
    pub fn kind(&self) -> Result<AliasKind, AliasError> {
        self.read(AliasKind::of)
    }

    /// Returns whether both aliases read and write the same slot.
    pub fn shares_slot_with(&self, other: &Alias) -> bool {
        match (&self.target, &other.target) {
            (Target::Detached(lhs), Target::Detached(rhs)) => Rc::ptr_eq(lhs, rhs),
            (
                Target::Bound { scope, name },
                Target::Bound {
                    scope: other_scope,
                    name: other_name,
                },
            ) => scope.same_as(other_scope) && name == other_name,
            _ => false,
        }
    }

    /// Length of the referenced value; scalars count as length 1.
    ///
    /// A chained slot reports the length of the nested alias's slot. A binding
    /// that has been removed from its scope reads as a scalar.
    pub fn length(&self) -> usize {
        match self.nested() {
            Ok(Some(inner)) => inner.slot_len(),
            _ => self.slot_len(),
        }
    }

    /// Reads `key` from the referenced value.
    ///
    /// A scalar slot only answers position 0; other positions and slices
    /// fail with `IndexOutOfRange`.
    pub fn get(&self, key: impl Into<Key>) -> Result<Value, AliasError> {
        let key = key.into();
        self.read(|slot| match slot {
            Value::List(items) => match key {
                Key::At(index) => resolve(index, items.len()).map(|pos| items[pos].clone()),
                Key::Slice(slice) => Ok(Value::List(
                    slice
                        .indices(items.len())?
                        .into_iter()
                        .map(|pos| items[pos].clone())
                        .collect(),
                )),
            },
            Value::Alias(_) => Ok(slot.clone()),
            scalar => match key {
                Key::At(0) => Ok(scalar.clone()),
                Key::At(index) => Err(AliasError::out_of_range(index, 1)),
                Key::Slice(_) => Err(AliasError::IndexOutOfRange(
                    ErrorInfo::new("scalar-slice-read", "cannot slice a scalar")
                        .with_context("type", scalar.type_name())
                        .with_hint("read position 0 instead"),
                )),
            },
        })?
    }

    /// Reads a dynamically typed key; non-integer, non-slice keys fail with
    /// `InvalidIndexType`.
    pub fn get_value(&self, key: &Value) -> Result<Value, AliasError> {
        self.get(Key::try_from(key)?)
    }

    /// Writes `value` at `key`.
    ///
    /// Negative positions are normalized exactly as in [`Alias::get`]. Writing
    /// position 0 of a scalar slot, or any key of a chained slot, replaces the
    /// whole slot.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<(), AliasError> {
        let key = key.into();
        let value = value.into();
        self.write(|slot| match slot {
            Value::List(items) => match key {
                Key::At(index) => {
                    let pos = resolve(index, items.len())?;
                    items[pos] = value;
                    Ok(())
                }
                Key::Slice(slice) => assign_slice(items, &slice, value),
            },
            other => {
                let chained = matches!(other, Value::Alias(_));
                match key {
                    Key::At(0) => {
                        *other = value;
                        Ok(())
                    }
                    _ if chained => {
                        *other = value;
                        Ok(())
                    }
                    Key::At(index) => Err(AliasError::out_of_range(index, 1)),
                    Key::Slice(_) => Err(AliasError::InvalidIndexType(
                        ErrorInfo::new("scalar-slice-write", "cannot assign a slice into a scalar")
                            .with_context("type", other.type_name()),
                    )),
                }
            }
        })?
    }

    /// Writes through a dynamically typed key.
    pub fn set_value(&self, key: &Value, value: impl Into<Value>) -> Result<(), AliasError> {
        self.set(Key::try_from(key)?, value)
    }

    /// Reads the current pointee (`*p`).
    ///
    /// A chained slot yields the nested alias. A list slot yields the element
    /// at the index when it is in range and the whole list otherwise; any other
    /// slot yields its value.
    pub fn dereference(&self) -> Result<Value, AliasError> {
        let index = self.index;
        self.read(|slot| match slot {
            Value::List(items) => match resolve(index, items.len()) {
                Ok(pos) => items[pos].clone(),
                Err(_) => {
                    trace!("index {index} outside list of {}, reading whole slot", items.len());
                    slot.clone()
                }
            },
            other => other.clone(),
        })
    }

    /// Writes the current pointee (`*p = value`).
    ///
    /// A list slot is written at the index and must be in range. A chained
    /// slot is written through the nested alias at this alias's index. Any
    /// other slot is replaced.
    pub fn set_dereferenced(&self, value: impl Into<Value>) -> Result<(), AliasError> {
        let value = value.into();
        if let Some(inner) = self.nested()? {
            return inner.set(self.index, value);
        }
        let index = self.index;
        self.write(|slot| match slot {
            Value::List(items) => {
                let pos = resolve(index, items.len())?;
                items[pos] = value;
                Ok(())
            }
            other => {
                *other = value;
                Ok(())
            }
        })?
    }

    /// Advances the index by one (`p++`).
    pub fn increment(&mut self) -> &mut Self {
        self.index += 1;
        self
    }

    /// Moves the index back by one (`p--`).
    pub fn decrement(&mut self) -> &mut Self {
        self.index -= 1;
        self
    }

    /// Reads the pointee, then advances (`*p++`).
    pub fn dereference_then_increment(&mut self) -> Result<Value, AliasError> {
        let value = self.dereference()?;
        self.increment();
        Ok(value)
    }

    /// Reads the pointee, then moves back (`*p--`).
    pub fn dereference_then_decrement(&mut self) -> Result<Value, AliasError> {
        let value = self.dereference()?;
        self.decrement();
        Ok(value)
    }

    /// Returns a new alias on the same slot with the index moved forward by `delta` (`p + n`).
    pub fn offset(&self, delta: impl Delta) -> Result<Alias, AliasError> {
        let delta = delta.to_delta()?;
        let index = self
            .index
            .checked_add(delta)
            .ok_or_else(|| overflow(self.index, delta))?;
        Ok(self.at(index))
    }

    /// Returns a new alias on the same slot with the index moved back by `delta` (`p - n`).
    pub fn offset_back(&self, delta: impl Delta) -> Result<Alias, AliasError> {
        let delta = delta.to_delta()?;
        let index = self
            .index
            .checked_sub(delta)
            .ok_or_else(|| overflow(self.index, delta))?;
        Ok(self.at(index))
    }

    /// Copies the alias (`q = p`): same slot and index, independent index afterwards.
    pub fn duplicate(&self) -> Alias {
        self.at(self.index)
    }

    fn at(&self, index: i64) -> Alias {
        Alias {
            target: self.target.clone(),
            index,
        }
    }

    fn label(&self) -> &str {
        self.name().unwrap_or(DETACHED_LABEL)
    }

    fn slot_len(&self) -> usize {
        self.read(|slot| slot.as_list().map_or(1, <[Value]>::len))
            .unwrap_or(1)
    }

    fn nested(&self) -> Result<Option<Alias>, AliasError> {
        self.read(|slot| slot.as_alias().cloned())
    }

    fn read<R>(&self, f: impl FnOnce(&Value) -> R) -> Result<R, AliasError> {
        match &self.target {
            Target::Detached(cell) => Ok(f(&*cell.borrow())),
            Target::Bound { scope, name } => scope.read(name, f),
        }
    }

    fn write<R>(&self, f: impl FnOnce(&mut Value) -> R) -> Result<R, AliasError> {
        match &self.target {
            Target::Detached(cell) => Ok(f(&mut *cell.borrow_mut())),
            Target::Bound { scope, name } => scope.write(name, f),
        }
    }
}

impl Default for Alias {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Alias {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.shares_slot_with(other)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Ok(AliasKind::Empty) => write!(f, "empty"),
            Ok(AliasKind::Sequence | AliasKind::Chained) => {
                write!(f, "alias to index=`{}` of `{}`", self.index, self.label())
            }
            _ => write!(f, "alias to `{}`", self.label()),
        }
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alias")
            .field("target", &self.label())
            .field("index", &self.index)
            .finish()
    }
}

/// `&p + n`; overflow is reported the same way as [`Alias::offset`].
impl Add<i64> for &Alias {
    type Output = Result<Alias, AliasError>;

    fn add(self, delta: i64) -> Self::Output {
        self.offset(delta)
    }
}

impl Add<i64> for Alias {
    type Output = Result<Alias, AliasError>;

    fn add(self, delta: i64) -> Self::Output {
        self.offset(delta)
    }
}

/// `&p - n`; overflow is reported the same way as [`Alias::offset_back`].
impl Sub<i64> for &Alias {
    type Output = Result<Alias, AliasError>;

    fn sub(self, delta: i64) -> Self::Output {
        self.offset_back(delta)
    }
}

impl Sub<i64> for Alias {
    type Output = Result<Alias, AliasError>;

    fn sub(self, delta: i64) -> Self::Output {
        self.offset_back(delta)
    }
}

/// Operand accepted by pointer arithmetic.
pub trait Delta {
    /// Converts the operand to a whole index offset.
    fn to_delta(&self) -> Result<i64, AliasError>;
}

impl Delta for i64 {
    fn to_delta(&self) -> Result<i64, AliasError> {
        Ok(*self)
    }
}

impl Delta for i32 {
    fn to_delta(&self) -> Result<i64, AliasError> {
        Ok(i64::from(*self))
    }
}

impl Delta for usize {
    fn to_delta(&self) -> Result<i64, AliasError> {
        i64::try_from(*self).map_err(|_| invalid_operand("delta exceeds the index range", self))
    }
}

impl Delta for f64 {
    fn to_delta(&self) -> Result<i64, AliasError> {
        // Whole values inside the i64 range only.
        if self.is_finite() && self.fract() == 0.0 && self.abs() < 9.0e18 {
            Ok(*self as i64)
        } else {
            Err(invalid_operand("offset must be a whole number", self))
        }
    }
}

impl Delta for Value {
    fn to_delta(&self) -> Result<i64, AliasError> {
        match self {
            Value::Int(delta) => Ok(*delta),
            Value::Bool(flag) => Ok(i64::from(*flag)),
            Value::Float(delta) => delta.to_delta(),
            other => Err(invalid_operand("offset must be a whole number", other.type_name())),
        }
    }
}

impl<T: Delta + ?Sized> Delta for &T {
    fn to_delta(&self) -> Result<i64, AliasError> {
        (**self).to_delta()
    }
}

/// Builder for aliases with optional value, name, index and scope.
///
/// * A name must already be bound in the scope (no scope means an empty one).
/// * A value without a name yields a detached alias, unless the value is an
///   alias equal to one stored in the scope, in which case the builder binds
///   to that slot.
/// * Neither value nor name yields an empty alias.
#[derive(Debug, Default)]
pub struct AliasBuilder {
    value: Option<Value>,
    name: Option<String>,
    index: i64,
    invalid_index: Option<AliasError>,
    scope: Option<Scope>,
}

impl AliasBuilder {
    /// Value to point at.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Explicit binding name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Starting index.
    pub fn index(mut self, index: i64) -> Self {
        self.index = index;
        self.invalid_index = None;
        self
    }

    /// Starting index from a dynamic value; only integers are accepted.
    pub fn index_value(mut self, index: &Value) -> Self {
        match index {
            Value::Int(index) => return self.index(*index),
            Value::Bool(flag) => return self.index(i64::from(*flag)),
            other => {
                self.invalid_index = Some(AliasError::InvalidIndex(
                    ErrorInfo::new("invalid-index", "index must be an integer")
                        .with_context("type", other.type_name()),
                ));
            }
        }
        self
    }

    /// Scope holding the binding.
    pub fn scope(mut self, scope: &Scope) -> Self {
        self.scope = Some(scope.clone());
        self
    }

    /// Resolves the binding and creates the alias.
    pub fn build(self) -> Result<Alias, AliasError> {
        let AliasBuilder {
            value,
            name,
            index,
            invalid_index,
            scope,
        } = self;
        if let Some(err) = invalid_index {
            return Err(err);
        }
        let scope = scope.unwrap_or_default();

        let mut alias = match (name, value) {
            (Some(name), value) => {
                if value.is_some() {
                    trace!("explicit name `{name}` given, slot value takes precedence");
                }
                Alias::bind(&scope, &name)?
            }
            (None, Some(Value::Alias(target))) => {
                match scope.find(|slot| slot.as_alias() == Some(&target)) {
                    Some(name) => Alias::bind(&scope, &name)?,
                    None => Alias::detached(Value::Alias(target)),
                }
            }
            (None, Some(value)) => {
                debug!("no binding name for {} value, detaching", value.type_name());
                Alias::detached(value)
            }
            (None, None) => Alias::empty(),
        };
        alias.index = index;
        Ok(alias)
    }
}

/// Normalizes a possibly negative position against `len`.
fn resolve(index: i64, len: usize) -> Result<usize, AliasError> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let pos = if index < 0 { index + signed_len } else { index };
    if (0..signed_len).contains(&pos) {
        Ok(pos as usize)
    } else {
        Err(AliasError::out_of_range(index, len))
    }
}

fn assign_slice(items: &mut Vec<Value>, slice: &Slice, value: Value) -> Result<(), AliasError> {
    let Value::List(replacement) = value else {
        return Err(AliasError::InvalidOperand(
            ErrorInfo::new("slice-requires-list", "slice assignment needs a list value")
                .with_context("type", value.type_name()),
        ));
    };
    if slice.is_contiguous() {
        let (start, stop, _) = slice.resolve(items.len())?;
        let start = start as usize;
        let stop = (stop as usize).max(start);
        items.splice(start..stop, replacement);
        return Ok(());
    }
    let positions = slice.indices(items.len())?;
    if positions.len() != replacement.len() {
        return Err(AliasError::InvalidOperand(
            ErrorInfo::new(
                "slice-length-mismatch",
                "extended slice assignment must keep the length",
            )
            .with_context("expected", positions.len())
            .with_context("actual", replacement.len()),
        ));
    }
    for (pos, item) in positions.into_iter().zip(replacement) {
        items[pos] = item;
    }
    Ok(())
}

fn invalid_operand(message: &str, operand: impl fmt::Display) -> AliasError {
    AliasError::InvalidOperand(
        ErrorInfo::new("invalid-operand", message).with_context("operand", operand),
    )
}

fn overflow(index: i64, delta: i64) -> AliasError {
    AliasError::InvalidOperand(
        ErrorInfo::new("index-overflow", "offset overflows the index")
            .with_context("index", index)
            .with_context("delta", delta),
    )
}
