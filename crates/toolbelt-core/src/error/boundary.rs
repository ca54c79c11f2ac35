/// Macro to define error boundaries with automatic `From` implementation.
///
/// The [`retry`](crate::retry::retry) helpers return the operation's own error
/// type, so a misconfigured delay has to be expressible in that type. This
/// macro declares the conversion once at the module boundary and lets `?` and
/// the retry helpers do the rest.
///
/// # Syntax
///
/// ```ignore
/// error_boundary!(SourceError => TargetError, |err_var| {
///     // conversion logic returning TargetError
/// });
/// ```
///
/// # Example
///
/// ```
/// use toolbelt_core::error_boundary;
///
/// #[derive(Debug, thiserror::Error)]
/// enum FetchError {
///     #[error("Config: {0}")]
///     Config(String),
///     #[error("Network: {0}")]
///     Network(String),
/// }
///
/// error_boundary!(toolbelt_core::Error => FetchError, |e| {
///     FetchError::Config(e.to_string())
/// });
///
/// # async fn example() -> Result<u32, FetchError> {
/// let value = toolbelt_core::retry::retry(3, || async { Ok::<_, FetchError>(7) }, 50).await?;
/// # Ok(value)
/// # }
/// ```
///
/// # Multiple Boundaries
///
/// Several source types may share the same target:
///
/// ```
/// use toolbelt_core::error_boundary;
/// use std::io;
///
/// #[derive(Debug, thiserror::Error)]
/// enum AppError {
///     #[error("IO: {0}")]
///     Io(String),
///     #[error("Config: {0}")]
///     Config(String),
/// }
///
/// error_boundary!(io::Error => AppError, |e| {
///     AppError::Io(e.to_string())
/// });
///
/// error_boundary!(toolbelt_core::Error => AppError, |e| {
///     AppError::Config(e.to_string())
/// });
/// ```
#[macro_export]
macro_rules! error_boundary {
    ($inner:ty => $outer:ty, |$err:ident| $body:expr) => {
        impl ::std::convert::From<$inner> for $outer {
            fn from($err: $inner) -> $outer {
                $body
            }
        }
    };
}
