//! Macros for reconciliation error handling.
//!
//! Convenience macros for creating and returning [`crate::error::SluiceError`]
//! instances with reduced boilerplate.

/// Creates a [`crate::error::SluiceError`] from error kind and description.
///
/// Accepts an optional dynamic detail as a third argument and an optional
/// source error via `source:`.
#[macro_export]
macro_rules! sluice_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::SluiceError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::error::SluiceError::from(($kind, $desc)).with_source($source)
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::SluiceError::from(($kind, $desc, $detail.to_string()))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        $crate::error::SluiceError::from(($kind, $desc, $detail.to_string())).with_source($source)
    };
}

/// Creates and returns a [`crate::error::SluiceError`] from the current
/// function.
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::sluice_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::sluice_error!($kind, $desc, source: $source))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return ::core::result::Result::Err($crate::sluice_error!($kind, $desc, $detail))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::sluice_error!(
            $kind,
            $desc,
            $detail,
            source: $source
        ))
    };
}
