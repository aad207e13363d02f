//! Macros for identifiers and state delegation.

/// Declare a string-backed identifier newtype.
///
/// The generated type is cheap to clone, usable as a map key, constructible
/// in `const` context and serialized as a plain string.
macro_rules! identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        $vis struct $name(::std::borrow::Cow<'static, str>);

        impl $name {
            /// Create an identifier from a static string, usable in `const` items.
            pub const fn from_static(value: &'static str) -> Self {
                Self(::std::borrow::Cow::Borrowed(value))
            }

            pub fn new(value: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Empty identifiers are never accepted by registration calls.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl From<&'static str> for $name {
            fn from(value: &'static str) -> Self {
                Self::from_static(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(::std::borrow::Cow::Owned(value))
            }
        }

        impl From<&$name> for $name {
            fn from(value: &$name) -> Self {
                value.clone()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Implement [`State`](crate::core::State) for a host state by delegating to
/// an embedded [`SimpleState`](crate::core::SimpleState) field.
///
/// # Example
///
/// ```
/// use statecraft::core::{SimpleState, State, StateLabel};
/// use statecraft::delegate_state;
///
/// const SHIPPED: StateLabel = StateLabel::from_static("shipped");
///
/// struct ShippedState {
///     base: SimpleState,
///     carrier: Option<String>,
/// }
///
/// delegate_state!(ShippedState, base);
///
/// let state = ShippedState {
///     base: SimpleState::new(SHIPPED),
///     carrier: None,
/// };
/// assert_eq!(state.label(), &SHIPPED);
/// assert!(state.carrier.is_none());
/// ```
#[macro_export]
macro_rules! delegate_state {
    ($ty:ty, $field:ident) => {
        impl $crate::core::State for $ty {
            fn label(&self) -> &$crate::core::StateLabel {
                $crate::core::State::label(&self.$field)
            }

            fn context(&self) -> Option<&$crate::core::ContextRef> {
                $crate::core::State::context(&self.$field)
            }

            fn set_context(&mut self, context: $crate::core::ContextRef) {
                $crate::core::State::set_context(&mut self.$field, context)
            }
        }
    };
}
