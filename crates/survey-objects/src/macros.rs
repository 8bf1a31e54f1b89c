//! Accessor generators shared by the object kinds
//!
//! Each object kind is a cheap handle over `Arc<RwLock<State>>`. The state
//! struct always has a `bags: ObjectAttributes` field and, for registered
//! kinds, a `registry: RegistryRef` field.

/// Declare a handle type over a state struct
macro_rules! survey_handle {
    ($(#[$meta:meta])* $name:ident => $state:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            inner: std::sync::Arc<parking_lot::RwLock<$state>>,
        }

        impl $name {
            fn from_state(state: $state) -> Self {
                Self {
                    inner: std::sync::Arc::new(parking_lot::RwLock::new(state)),
                }
            }

            #[allow(dead_code)]
            fn state(&self) -> parking_lot::RwLockReadGuard<'_, $state> {
                self.inner.read()
            }

            #[allow(dead_code)]
            fn state_mut(&self) -> parking_lot::RwLockWriteGuard<'_, $state> {
                self.inner.write()
            }
        }

        impl $crate::object::AttributeBags for $name {
            fn bags(&self) -> parking_lot::MappedRwLockReadGuard<'_, $crate::object::ObjectAttributes> {
                parking_lot::RwLockReadGuard::map(self.inner.read(), |state| &state.bags)
            }

            fn bags_mut(&self) -> parking_lot::MappedRwLockWriteGuard<'_, $crate::object::ObjectAttributes> {
                parking_lot::RwLockWriteGuard::map(self.inner.write(), |state| &mut state.bags)
            }

            fn ptr_eq(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.inner, &other.inner)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("uuid", &$crate::object::SurveyObject::uuid(self))
                    .finish_non_exhaustive()
            }
        }
    };
    ($(#[$meta:meta])* $name:ident => $state:ident, registered) => {
        survey_handle!($(#[$meta])* $name => $state);

        impl $name {
            /// Registry this object was constructed with, if still alive
            #[must_use]
            pub fn registry(&self) -> Option<$crate::registry::SurveyObjectsRegistry> {
                self.inner.read().registry.upgrade()
            }
        }
    };
}

/// Typed getter/setter pairs over the scalar attribute bag
macro_rules! scalar_attributes {
    ($($getter:ident, $setter:ident: $ty:ty = $key:literal;)*) => {
        $(
            #[doc = concat!("`", $key, "` attribute")]
            #[must_use]
            pub fn $getter(&self) -> Option<$ty> {
                survey_core::params::get_attribute(
                    &$crate::object::AttributeBags::bags(self).attributes,
                    $key,
                )
            }

            #[doc = concat!("Set or clear the `", $key, "` attribute")]
            pub fn $setter(&self, value: Option<$ty>) {
                survey_core::params::set_attribute(
                    &mut $crate::object::AttributeBags::bags_mut(self).attributes,
                    $key,
                    value,
                );
            }
        )*
    };
}

/// Getter/setter pairs over parent uuid references held in the state
macro_rules! reference_uuids {
    ($($field:ident, $setter:ident;)*) => {
        $(
            #[doc = concat!("Parent reference `", stringify!($field), "`")]
            #[must_use]
            pub fn $field(&self) -> Option<String> {
                self.state().$field.clone()
            }

            #[doc = concat!("Set or clear `", stringify!($field), "`")]
            pub fn $setter(&self, value: Option<String>) {
                self.state_mut().$field = value;
            }
        )*
    };
}

/// Getter/setter pairs over composed children held in the state
macro_rules! composed_children {
    ($($field:ident, $setter:ident: $ty:ty;)*) => {
        $(
            #[doc = concat!("Composed `", stringify!($field), "`")]
            #[must_use]
            pub fn $field(&self) -> $ty {
                self.state().$field.clone()
            }

            #[doc = concat!("Replace composed `", stringify!($field), "`")]
            pub fn $setter(&self, value: $ty) {
                self.state_mut().$field = value;
            }
        )*
    };
}
