//! Property interception
//!
//! [`patch`] replaces an existing property with an accessor pair that layers
//! caller-supplied hooks over the property's original behavior. The original
//! access semantics - whether the property was a stored value or an accessor
//! pair, own or inherited - are normalized into two plain callables and
//! handed to the hooks, which decide whether to delegate back.
//!
//! # Example
//!
//! ```
//! use propshim::{patch, Hooks, Object, Value};
//!
//! let obj = Object::new();
//! obj.define_data("foo", Value::string("bar"));
//!
//! patch(
//!     &obj,
//!     "foo",
//!     Hooks::new().on_read(|_obj, orig| {
//!         let value = orig()?;
//!         Ok(Value::string(format!("{}!", value)))
//!     }),
//! )
//! .unwrap();
//!
//! assert_eq!(obj.get("foo").unwrap(), Value::string("bar!"));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{PatchError, Result};
use crate::reflect::{find_descriptor, Getter, PropertyDescriptor, Reflect, Setter};
use crate::value::Value;

/// The original read behavior, already bound to its receiver.
pub type OrigGetter = dyn Fn() -> Result<Value>;

/// The original write behavior, already bound to its receiver.
pub type OrigSetter = dyn Fn(Value) -> Result<()>;

/// A read hook: receives the target and the original getter, returns the
/// value to expose.
pub type ReadHook<O> = Rc<dyn Fn(&O, &OrigGetter) -> Result<Value>>;

/// A write hook: receives the target, the incoming value, and the original
/// setter. The hook decides whether to forward.
pub type WriteHook<O> = Rc<dyn Fn(&O, Value, &OrigSetter) -> Result<()>>;

/// Caller-supplied hooks for [`patch`]: zero, one, or both of a read hook
/// and a write hook.
///
/// An omitted hook means that side of the property passes straight through
/// to the original behavior.
pub struct Hooks<O> {
    /// Runs instead of a read; receives the original getter
    pub on_read: Option<ReadHook<O>>,

    /// Runs instead of a write; receives the value and the original setter
    pub on_write: Option<WriteHook<O>>,
}

impl<O> Hooks<O> {
    /// Create an empty hook set (both sides pass through).
    pub fn new() -> Self {
        Self {
            on_read: None,
            on_write: None,
        }
    }

    /// Set the read hook.
    pub fn on_read(mut self, hook: impl Fn(&O, &OrigGetter) -> Result<Value> + 'static) -> Self {
        self.on_read = Some(Rc::new(hook));
        self
    }

    /// Set the write hook.
    pub fn on_write(
        mut self,
        hook: impl Fn(&O, Value, &OrigSetter) -> Result<()> + 'static,
    ) -> Self {
        self.on_write = Some(Rc::new(hook));
        self
    }
}

impl<O> Default for Hooks<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for Hooks<O> {
    fn clone(&self) -> Self {
        Self {
            on_read: self.on_read.clone(),
            on_write: self.on_write.clone(),
        }
    }
}

impl<O> fmt::Debug for Hooks<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_read", &self.on_read.is_some())
            .field("on_write", &self.on_write.is_some())
            .finish()
    }
}

/// Intercept reads and writes of an existing property.
///
/// Finds the nearest descriptor for `key` along `target`'s delegation
/// chain, normalizes it into an original getter/setter pair, and redefines
/// the property as an own accessor on `target` that routes through `hooks`.
/// Hooks are invoked with `target` and the bound original callable; an
/// omitted hook passes through to the original.
///
/// Patching the same key again layers over the previously installed
/// behavior: the new hooks see the prior patch's accessors as "original".
/// There is no un-patch.
///
/// # Errors
///
/// - `NotFound` if no descriptor exists for `key` anywhere in the chain
/// - `NotConfigurable` if the descriptor found refuses redefinition
///
/// Both are raised before the target is touched. A third failure surfaces
/// later, at access time: invoking the original getter/setter when the
/// patched property was an accessor missing that half fails with
/// `MissingGetter`/`MissingSetter` from the callable itself.
pub fn patch<O: Reflect>(target: &O, key: &str, hooks: Hooks<O>) -> Result<()> {
    let descriptor = match find_descriptor(target, key) {
        None => {
            return Err(PatchError::NotFound {
                key: key.to_string(),
            })
        }
        Some(descriptor) if !descriptor.is_configurable() => {
            return Err(PatchError::NotConfigurable {
                key: key.to_string(),
            })
        }
        Some(descriptor) => descriptor,
    };

    let (orig_get, orig_set) = normalize(target, key, descriptor);

    let get: Getter<O> = match hooks.on_read {
        None => {
            let orig = Rc::clone(&orig_get);
            Rc::new(move |_: &O| orig())
        }
        Some(hook) => {
            let target = target.clone();
            let orig = Rc::clone(&orig_get);
            Rc::new(move |_: &O| hook(&target, &*orig))
        }
    };

    let set: Setter<O> = match hooks.on_write {
        None => {
            let orig = Rc::clone(&orig_set);
            Rc::new(move |_: &O, value| orig(value))
        }
        Some(hook) => {
            let target = target.clone();
            let orig = Rc::clone(&orig_set);
            Rc::new(move |_: &O, value| hook(&target, value, &*orig))
        }
    };

    // Always installed as an own property of the target, configurable so
    // that later patches can layer over this one.
    target.define_own(key, PropertyDescriptor::accessor(Some(get), Some(set)));
    Ok(())
}

/// Collapse either descriptor shape into a receiver-bound getter/setter
/// pair.
///
/// A stored value becomes a private cell owned by the returned closures;
/// after this, the value is reachable only through them. An accessor keeps
/// its halves, bound to `target` as receiver; a missing half becomes a thunk
/// that fails only when invoked.
fn normalize<O: Reflect>(
    target: &O,
    key: &str,
    descriptor: PropertyDescriptor<O>,
) -> (Rc<OrigGetter>, Rc<OrigSetter>) {
    match descriptor {
        PropertyDescriptor::Data { value, .. } => {
            let cell = Rc::new(RefCell::new(value));
            let read = {
                let cell = Rc::clone(&cell);
                Rc::new(move || Ok(cell.borrow().clone())) as Rc<OrigGetter>
            };
            let write = Rc::new(move |value: Value| {
                *cell.borrow_mut() = value;
                Ok(())
            }) as Rc<OrigSetter>;
            (read, write)
        }
        PropertyDescriptor::Accessor { get, set, .. } => {
            let read = match get {
                Some(get) => {
                    let target = target.clone();
                    Rc::new(move || get(&target)) as Rc<OrigGetter>
                }
                None => {
                    let key = key.to_string();
                    Rc::new(move || {
                        Err(PatchError::MissingGetter { key: key.clone() })
                    }) as Rc<OrigGetter>
                }
            };
            let write = match set {
                Some(set) => {
                    let target = target.clone();
                    Rc::new(move |value: Value| set(&target, value)) as Rc<OrigSetter>
                }
                None => {
                    let key = key.to_string();
                    Rc::new(move |_value: Value| {
                        Err(PatchError::MissingSetter { key: key.clone() })
                    }) as Rc<OrigSetter>
                }
            };
            (read, write)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    #[test]
    fn test_hooks_builder() {
        let hooks: Hooks<Object> = Hooks::new();
        assert!(hooks.on_read.is_none());
        assert!(hooks.on_write.is_none());

        let hooks = hooks
            .on_read(|_, orig| orig())
            .on_write(|_, value, orig| orig(value));
        assert!(hooks.on_read.is_some());
        assert!(hooks.on_write.is_some());
        assert_eq!(format!("{:?}", hooks), "Hooks { on_read: true, on_write: true }");
    }

    #[test]
    fn test_normalize_data_round_trips() {
        let obj = Object::new();
        let (read, write) = normalize(
            &obj,
            "x",
            PropertyDescriptor::data(Value::I64(1)),
        );

        assert_eq!(read().unwrap(), Value::I64(1));
        write(Value::I64(2)).unwrap();
        assert_eq!(read().unwrap(), Value::I64(2));
    }

    #[test]
    fn test_normalize_missing_halves_fail_lazily() {
        let obj = Object::new();
        let (read, write) = normalize(
            &obj,
            "x",
            PropertyDescriptor::accessor(None, None),
        );

        // Thunks exist; they fail only when invoked.
        assert!(matches!(
            read().unwrap_err(),
            PatchError::MissingGetter { .. }
        ));
        assert!(matches!(
            write(Value::Unit).unwrap_err(),
            PatchError::MissingSetter { .. }
        ));
    }

    #[test]
    fn test_normalize_binds_accessor_to_target() {
        let obj = Object::new();
        obj.define_data("_backing", Value::I64(10));

        let descriptor = PropertyDescriptor::accessor(
            Some(Rc::new(|receiver: &Object| receiver.get("_backing"))),
            Some(Rc::new(|receiver: &Object, value| {
                receiver.set("_backing", value)
            })),
        );

        let (read, write) = normalize(&obj, "x", descriptor);
        assert_eq!(read().unwrap(), Value::I64(10));
        write(Value::I64(11)).unwrap();
        assert_eq!(obj.get("_backing").unwrap(), Value::I64(11));
    }

    #[test]
    fn test_patch_guard_runs_before_any_mutation() {
        let obj = Object::new();
        obj.define_data("foo", Value::string("bar"));

        let err = patch(&obj, "hoge", Hooks::new().on_read(|_, _| Ok(Value::Unit))).unwrap_err();
        assert!(matches!(err, PatchError::NotFound { .. }));

        // Untouched: foo still there, hoge still absent.
        assert_eq!(obj.own_keys(), vec!["foo"]);
        assert_eq!(obj.get("foo").unwrap(), Value::string("bar"));
    }

    #[test]
    fn test_patch_rejects_sealed_property() {
        let obj = Object::new();
        obj.define_sealed("locked", Value::I64(1));

        let err = patch(&obj, "locked", Hooks::new()).unwrap_err();
        assert!(matches!(err, PatchError::NotConfigurable { .. }));
        assert_eq!(err.key(), "locked");

        // Still a data property, still readable.
        assert!(obj.own_descriptor("locked").unwrap().is_data());
        assert_eq!(obj.get("locked").unwrap(), Value::I64(1));
    }

    #[test]
    fn test_patch_installs_own_accessor() {
        let proto = Object::new();
        proto.define_data("foo", Value::string("bar"));

        let obj = Object::with_prototype(&proto);
        assert!(!obj.has_own("foo"));

        patch(&obj, "foo", Hooks::new()).unwrap();

        // Installed on the target itself, as an accessor, configurable.
        let installed = obj.own_descriptor("foo").unwrap();
        assert!(installed.is_accessor());
        assert!(installed.is_configurable());
        // Prototype keeps its original data property.
        assert!(proto.own_descriptor("foo").unwrap().is_data());
    }
}
