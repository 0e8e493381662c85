//! Helper macro for declaring port error enums.
//!
//! Repository adapters raise structured errors; writing the enum, the
//! `thiserror` display strings, and `Into`-taking constructors by hand for
//! every port invites drift. The macro generates all three from one block.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Construct the `", stringify!($variant), "` variant.")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Sample error used to exercise the macro shapes.
        pub enum SamplePortError {
            /// Unit variant.
            Missing => "record missing",
            /// Single string field.
            Broken { message: String } => "broken: {message}",
            /// Mixed field types.
            Clashed { year: i32, message: String } => "clash in {year}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_argless_constructors() {
        assert_eq!(SamplePortError::missing().to_string(), "record missing");
    }

    #[test]
    fn string_fields_accept_str_slices() {
        let err = SamplePortError::broken("wires crossed");
        assert_eq!(err.to_string(), "broken: wires crossed");
    }

    #[test]
    fn mixed_fields_keep_their_order() {
        let err = SamplePortError::clashed(2026, "duplicate sequence");
        assert_eq!(err.to_string(), "clash in 2026: duplicate sequence");
    }
}
