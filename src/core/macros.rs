//! Macros for declaring field keys.

/// Declare a field key enum and implement [`FieldKey`](crate::core::FieldKey) for it.
///
/// Each variant may carry an explicit configuration name; otherwise the
/// variant identifier is used. The generated enum also gets an `ALL`
/// constant listing the variants in declaration order.
///
/// # Example
///
/// ```
/// use formstate::core::FieldKey;
/// use formstate::field_keys;
///
/// field_keys! {
///     pub enum Contact {
///         Name = "name",
///         Phone = "phone",
///         Email = "email",
///     }
/// }
///
/// assert_eq!(Contact::Phone.name(), "phone");
/// assert_eq!(Contact::from_name("email"), Some(Contact::Email));
/// assert_eq!(Contact::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! field_keys {
    (@name $variant:ident $label:literal) => {
        $label
    };
    (@name $variant:ident) => {
        stringify!($variant)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(= $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every key, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::FieldKey for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::field_keys!(@name $variant $($label)?)),*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|key| key.name() == name)
            }
        }
    };
}
