#![deny(missing_docs)]
#![doc = "Pointer emulation over shared, named storage slots.\n\nAn [`Alias`] names a slot inside a [`Scope`] (or owns a private detached cell), carries an index into the slot when it holds a list, and supports dereference, set-through, copies and pointer arithmetic."]

pub mod alias;
pub mod errors;
pub mod key;
pub mod scope;
pub mod value;

pub use alias::{Alias, AliasBuilder, AliasKind, Delta};
pub use errors::{AliasError, ErrorInfo};
pub use key::{Key, Slice};
pub use scope::Scope;
pub use value::Value;
