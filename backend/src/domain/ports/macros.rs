//! Declarative helper for repository error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! arguments accept anything convertible into the field type, so adapters can
//! write `UserRepositoryError::query(err.to_string())` or pass a `&str`.

macro_rules! define_port_error {
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

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Build [`" $name "::" $variant "`]."]
                    pub fn [<$variant:snake>]($( $($field: impl Into<$ty>),* )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
