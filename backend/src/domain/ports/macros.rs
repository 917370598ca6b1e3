//! Macros shared by the driven port modules.
//!
//! Every Appwrite-facing port declares its error enum with
//! `define_port_error!` and classifies it with
//! `classify_backend_failure!`, so services can map any port failure to a
//! domain error without matching on adapter-specific variants.

/// Declares a `thiserror` enum plus one snake_case constructor per variant.
///
/// Constructor parameters take `impl Into<T>` for each field, so
/// `AccountGatewayError::unauthorized("no session")` builds
/// `Unauthorized { message: "no session".into() }`.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
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
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
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

/// Implements [`BackendFailure`](super::BackendFailure) classification for a
/// port error generated with the standard backend variant set
/// (`Unauthorized`, `NotFound`, `Conflict`, `Rejected`, `Transport`,
/// `Decode`, each carrying `message`).
macro_rules! classify_backend_failure {
    ($name:ident) => {
        impl $name {
            /// Failure category shared by every backend-facing port.
            pub fn failure(&self) -> $crate::domain::ports::BackendFailure {
                use $crate::domain::ports::BackendFailure;
                match self {
                    Self::Unauthorized { .. } => BackendFailure::Unauthorized,
                    Self::NotFound { .. } => BackendFailure::NotFound,
                    Self::Conflict { .. } => BackendFailure::Conflict,
                    Self::Rejected { .. } => BackendFailure::Rejected,
                    Self::Transport { .. } => BackendFailure::Transport,
                    Self::Decode { .. } => BackendFailure::Decode,
                }
            }
        }
    };
}

pub(crate) use classify_backend_failure;
pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::ports::BackendFailure;

    define_port_error! {
        pub enum ExamplePortError {
            Unauthorized { message: String } => "unauthorized: {message}",
            NotFound { message: String } => "not found: {message}",
            Conflict { message: String } => "conflict: {message}",
            Rejected { message: String } => "rejected: {message}",
            Transport { message: String } => "transport: {message}",
            Decode { message: String } => "decode: {message}",
        }
    }

    classify_backend_failure!(ExamplePortError);

    define_port_error! {
        pub enum CountingError {
            Overflow { count: u32 } => "overflow: {count}",
            Mixed { message: String, count: u32 } => "mixed: {message} ({count})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::rejected("bad payload");
        assert_eq!(err.to_string(), "rejected: bad payload");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = CountingError::overflow(42_u32);
        assert_eq!(err.to_string(), "overflow: 42");
        let mixed = CountingError::mixed("hello", 7_u32);
        assert_eq!(mixed.to_string(), "mixed: hello (7)");
    }

    #[test]
    fn classification_follows_variant() {
        assert_eq!(
            ExamplePortError::unauthorized("x").failure(),
            BackendFailure::Unauthorized
        );
        assert_eq!(
            ExamplePortError::decode("x").failure(),
            BackendFailure::Decode
        );
        assert_eq!(
            ExamplePortError::conflict("x").failure(),
            BackendFailure::Conflict
        );
    }
}
