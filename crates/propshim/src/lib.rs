//! # Propshim
//!
//! Transparent property interception for dynamic objects.
//!
//! Given an object whose properties are either stored values or accessor
//! pairs, [`patch`] replaces a named property with a new accessor pair that
//! layers caller-supplied read/write hooks over the original behavior. The
//! original access semantics are normalized into plain callables and handed
//! to the hooks, so a hook can observe, replace, or delegate back to
//! whatever the property used to do.
//!
//! ## Architecture
//!
//! - **Reflection seam**: the [`Reflect`] trait - own-descriptor lookup, one
//!   step of delegation, own-property redefinition. The interceptor depends
//!   on nothing else.
//! - **Host model**: [`Object`], a small prototype-delegating object with an
//!   ordered property table, provided as the in-crate `Reflect`
//!   implementation.
//! - **Interceptor**: [`patch`] - lookup, guard, normalize, install.
//!
//! ## Limitations
//!
//! Single-threaded by contract: handles are `Rc`-based and `!Send`, and no
//! synchronization is provided. Patching is permanent - there is no
//! un-patch. Properties that do not exist, or are not configurable, cannot
//! be patched.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod object;
pub mod patch;
pub mod reflect;
pub mod value;

// Re-export main types
pub use error::{PatchError, Result};
pub use object::Object;
pub use patch::{patch, Hooks, OrigGetter, OrigSetter, ReadHook, WriteHook};
pub use reflect::{find_descriptor, Getter, PropertyDescriptor, Reflect, Setter};
pub use value::Value;

/// Propshim version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
