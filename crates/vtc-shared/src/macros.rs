/// Panics in debug builds so errors that should never happen get noticed.
/// Release builds carry on and rely on the caller having logged it.
#[macro_export]
macro_rules! debug_panic {
    ($($arg:tt)+) => {
        if cfg!(debug_assertions) && $crate::const_config::PANIC_ON_RARE_ERR {
            panic!("rare error detected: {}", format_args!($($arg)+))
        }
    };
}

/// Logs `err` together with where it was caught and returns the message to
/// show to the user
#[macro_export]
macro_rules! internal_error {
    ($err: expr) => {{
        let internal_error_msg = format!("{}\ninternal error at {}:{}", $err, file!(), line!());
        tracing::error!(%internal_error_msg);
        internal_error_msg
    }};
}
