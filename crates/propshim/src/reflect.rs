//! Reflection seam: property descriptors and the capability trait
//!
//! The interceptor never touches a concrete object type. It sees the host
//! object model only through [`Reflect`]: own-descriptor lookup, one step of
//! delegation, and own-property redefinition. Any object system that can
//! offer those three capabilities can be patched.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

/// A read accessor: invoked with the receiver, produces the property value.
pub type Getter<O> = Rc<dyn Fn(&O) -> Result<Value>>;

/// A write accessor: invoked with the receiver and the incoming value.
pub type Setter<O> = Rc<dyn Fn(&O, Value) -> Result<()>>;

/// How a property currently behaves: a stored value, or an accessor pair.
///
/// Exactly one of the two shapes at a time; the enum is the invariant. An
/// accessor descriptor may have zero, one, or both halves present.
pub enum PropertyDescriptor<O> {
    /// A plain stored value
    Data {
        /// The stored value
        value: Value,
        /// Whether the property may later be redefined
        configurable: bool,
    },

    /// A computed property defined by accessor functions
    Accessor {
        /// Read accessor, if any
        get: Option<Getter<O>>,
        /// Write accessor, if any
        set: Option<Setter<O>>,
        /// Whether the property may later be redefined
        configurable: bool,
    },
}

impl<O> PropertyDescriptor<O> {
    /// Create a configurable data descriptor.
    pub fn data(value: Value) -> Self {
        PropertyDescriptor::Data {
            value,
            configurable: true,
        }
    }

    /// Create a non-configurable data descriptor.
    ///
    /// Properties defined this way refuse patching.
    pub fn sealed_data(value: Value) -> Self {
        PropertyDescriptor::Data {
            value,
            configurable: false,
        }
    }

    /// Create a configurable accessor descriptor.
    pub fn accessor(get: Option<Getter<O>>, set: Option<Setter<O>>) -> Self {
        PropertyDescriptor::Accessor {
            get,
            set,
            configurable: true,
        }
    }

    /// Create a read-only accessor descriptor (getter, no setter).
    pub fn getter_only(get: Getter<O>) -> Self {
        Self::accessor(Some(get), None)
    }

    /// Create a write-only accessor descriptor (setter, no getter).
    pub fn setter_only(set: Setter<O>) -> Self {
        Self::accessor(None, Some(set))
    }

    /// Whether this property may be redefined.
    pub fn is_configurable(&self) -> bool {
        match self {
            PropertyDescriptor::Data { configurable, .. }
            | PropertyDescriptor::Accessor { configurable, .. } => *configurable,
        }
    }

    /// Whether this is a data (stored value) descriptor.
    pub fn is_data(&self) -> bool {
        matches!(self, PropertyDescriptor::Data { .. })
    }

    /// Whether this is an accessor descriptor.
    pub fn is_accessor(&self) -> bool {
        matches!(self, PropertyDescriptor::Accessor { .. })
    }
}

impl<O> Clone for PropertyDescriptor<O> {
    fn clone(&self) -> Self {
        match self {
            PropertyDescriptor::Data {
                value,
                configurable,
            } => PropertyDescriptor::Data {
                value: value.clone(),
                configurable: *configurable,
            },
            PropertyDescriptor::Accessor {
                get,
                set,
                configurable,
            } => PropertyDescriptor::Accessor {
                get: get.clone(),
                set: set.clone(),
                configurable: *configurable,
            },
        }
    }
}

impl<O> fmt::Debug for PropertyDescriptor<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDescriptor::Data {
                value,
                configurable,
            } => f
                .debug_struct("Data")
                .field("value", value)
                .field("configurable", configurable)
                .finish(),
            PropertyDescriptor::Accessor {
                get,
                set,
                configurable,
            } => f
                .debug_struct("Accessor")
                .field("get", &get.is_some())
                .field("set", &set.is_some())
                .field("configurable", configurable)
                .finish(),
        }
    }
}

/// The narrow capability surface the interceptor requires of an object.
///
/// Handles are expected to be cheap to clone (reference semantics): cloning
/// a `Reflect` value clones a handle to the same underlying object, not the
/// object itself.
pub trait Reflect: Clone + 'static {
    /// Look up a descriptor defined directly on this object, not through
    /// its delegation chain.
    fn own_descriptor(&self, key: &str) -> Option<PropertyDescriptor<Self>>;

    /// The next object in the delegation chain, or `None` at the chain's
    /// end.
    fn delegate(&self) -> Option<Self>;

    /// Define (or redefine) a property directly on this object.
    fn define_own(&self, key: &str, descriptor: PropertyDescriptor<Self>);
}

/// Walk the delegation chain starting at `start`, returning the first own
/// descriptor found for `key`.
///
/// The chain ends when `delegate()` returns `None`; nothing past that point
/// contributes properties.
pub fn find_descriptor<O: Reflect>(start: &O, key: &str) -> Option<PropertyDescriptor<O>> {
    let mut current = Some(start.clone());
    while let Some(object) = current {
        if let Some(descriptor) = object.own_descriptor(key) {
            return Some(descriptor);
        }
        current = object.delegate();
    }
    None
}
