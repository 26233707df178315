//! A small prototype-delegating object model
//!
//! [`Object`] is the in-crate host for the interceptor: an ordered property
//! table behind a cheap-clone handle, with an optional prototype fixed at
//! construction. Accessors receive their receiver explicitly, so a getter
//! defined on a prototype can still read a backing field on the object the
//! access started from.
//!
//! # Example
//!
//! ```
//! use propshim::{Object, Value};
//!
//! let obj = Object::new();
//! obj.define_data("foo", Value::string("bar"));
//!
//! assert_eq!(obj.get("foo").unwrap(), Value::string("bar"));
//!
//! obj.set("foo", Value::string("baz")).unwrap();
//! assert_eq!(obj.get("foo").unwrap(), Value::string("baz"));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::{PatchError, Result};
use crate::reflect::{Getter, PropertyDescriptor, Reflect, Setter};
use crate::value::Value;

struct ObjectInner {
    /// Own properties in definition order
    properties: RefCell<IndexMap<String, PropertyDescriptor<Object>>>,

    /// Next object in the delegation chain, fixed at construction
    prototype: Option<Object>,
}

/// A dynamic object: an own-property table plus an optional prototype.
///
/// `Object` is a handle; cloning it yields another handle to the same
/// underlying object. The type is deliberately `!Send` (`Rc`/`RefCell`
/// inside) - the crate's contract is single-threaded.
#[derive(Clone)]
pub struct Object {
    inner: Rc<ObjectInner>,
}

impl Object {
    /// Create an empty object with no prototype.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                properties: RefCell::new(IndexMap::new()),
                prototype: None,
            }),
        }
    }

    /// Create an empty object delegating to `prototype`.
    pub fn with_prototype(prototype: &Object) -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                properties: RefCell::new(IndexMap::new()),
                prototype: Some(prototype.clone()),
            }),
        }
    }

    /// The object this one delegates to, if any.
    pub fn prototype(&self) -> Option<Object> {
        self.inner.prototype.clone()
    }

    /// Whether two handles refer to the same underlying object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Property Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Define a configurable stored-value property.
    pub fn define_data(&self, key: impl Into<String>, value: Value) {
        self.insert(key.into(), PropertyDescriptor::data(value));
    }

    /// Define a non-configurable stored-value property.
    pub fn define_sealed(&self, key: impl Into<String>, value: Value) {
        self.insert(key.into(), PropertyDescriptor::sealed_data(value));
    }

    /// Define a configurable accessor property from an optional getter and
    /// an optional setter.
    pub fn define_accessor(
        &self,
        key: impl Into<String>,
        get: Option<Getter<Object>>,
        set: Option<Setter<Object>>,
    ) {
        self.insert(key.into(), PropertyDescriptor::accessor(get, set));
    }

    fn insert(&self, key: String, descriptor: PropertyDescriptor<Object>) {
        self.inner.properties.borrow_mut().insert(key, descriptor);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Property Access
    // ═══════════════════════════════════════════════════════════════════

    /// Read a property, resolving through the delegation chain.
    ///
    /// Accessor getters are invoked with `self` as the receiver, even when
    /// the accessor was found further up the chain.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no descriptor exists anywhere in the chain
    /// - `MissingGetter` if the nearest descriptor is an accessor without
    ///   a read half
    pub fn get(&self, key: &str) -> Result<Value> {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if let Some(descriptor) = object.own_descriptor(key) {
                // Descriptor is cloned out; no borrow is held while the
                // accessor runs.
                return match descriptor {
                    PropertyDescriptor::Data { value, .. } => Ok(value),
                    PropertyDescriptor::Accessor { get: Some(get), .. } => get(self),
                    PropertyDescriptor::Accessor { get: None, .. } => {
                        Err(PatchError::MissingGetter {
                            key: key.to_string(),
                        })
                    }
                };
            }
            current = object.delegate();
        }
        Err(PatchError::NotFound {
            key: key.to_string(),
        })
    }

    /// Write a property, resolving through the delegation chain.
    ///
    /// The nearest accessor setter wins and is invoked with `self` as the
    /// receiver. Assigning over an own stored value updates it in place
    /// (keeping its configurability). Assigning over an inherited stored
    /// value, or a key with no descriptor at all, defines a fresh
    /// configurable own property on `self` - the usual shadowing assignment
    /// of a delegating object model.
    ///
    /// # Errors
    ///
    /// - `MissingSetter` if the nearest descriptor is an accessor without
    ///   a write half
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if let Some(descriptor) = object.own_descriptor(key) {
                return match descriptor {
                    PropertyDescriptor::Accessor { set: Some(set), .. } => set(self, value),
                    PropertyDescriptor::Accessor { set: None, .. } => {
                        Err(PatchError::MissingSetter {
                            key: key.to_string(),
                        })
                    }
                    PropertyDescriptor::Data { configurable, .. } => {
                        if object.ptr_eq(self) {
                            self.insert(
                                key.to_string(),
                                PropertyDescriptor::Data {
                                    value,
                                    configurable,
                                },
                            );
                        } else {
                            self.insert(key.to_string(), PropertyDescriptor::data(value));
                        }
                        Ok(())
                    }
                };
            }
            current = object.delegate();
        }
        self.insert(key.to_string(), PropertyDescriptor::data(value));
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Check if a property is defined directly on this object.
    pub fn has_own(&self, key: &str) -> bool {
        self.inner.properties.borrow().contains_key(key)
    }

    /// Check if a property resolves anywhere in the delegation chain.
    pub fn has(&self, key: &str) -> bool {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            if object.has_own(key) {
                return true;
            }
            current = object.delegate();
        }
        false
    }

    /// Own property keys in definition order.
    pub fn own_keys(&self) -> Vec<String> {
        self.inner.properties.borrow().keys().cloned().collect()
    }

    /// Number of own properties.
    pub fn len(&self) -> usize {
        self.inner.properties.borrow().len()
    }

    /// Check if the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.inner.properties.borrow().is_empty()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Reflect for Object {
    fn own_descriptor(&self, key: &str) -> Option<PropertyDescriptor<Self>> {
        self.inner.properties.borrow().get(key).cloned()
    }

    fn delegate(&self) -> Option<Self> {
        self.prototype()
    }

    fn define_own(&self, key: &str, descriptor: PropertyDescriptor<Self>) {
        self.insert(key.to_string(), descriptor);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let properties = self.inner.properties.borrow();
        let mut map = f.debug_map();
        for (key, descriptor) in properties.iter() {
            map.entry(key, descriptor);
        }
        map.finish()
    }
}
