//! Enums that travel as a single integer discriminant.

/// Declare a `#[repr(u8)]` enum that converts to and from its wire value
/// and (de)serializes as that integer.
macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value
            ),+
        }

        impl $name {
            /// Wire discriminant.
            #[must_use]
            pub const fn to_raw(self) -> u8 {
                self as u8
            }

            /// Parse a wire discriminant, `None` if no variant matches.
            #[must_use]
            pub const fn from_raw(raw: u8) -> Option<Self> {
                match raw {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.to_raw())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <u8 as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::from_raw(raw).ok_or_else(|| {
                    <D::Error as ::serde::de::Error>::custom(format!(
                        concat!("invalid ", stringify!($name), " discriminant {}"),
                        raw
                    ))
                })
            }
        }
    };
}

pub(crate) use raw_enum;
