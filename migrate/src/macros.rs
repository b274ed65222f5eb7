//! Macros for migration error handling.

/// Creates a [`crate::error::MigrateError`] from error kind and description,
/// optionally followed by a dynamic detail.
#[macro_export]
macro_rules! migrate_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::MigrateError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::MigrateError::from(($kind, $desc, $detail.to_string()))
    };
}

/// Creates and returns a [`crate::error::MigrateError`] from the current function.
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return Err($crate::migrate_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return Err($crate::migrate_error!($kind, $desc, $detail))
    };
}
