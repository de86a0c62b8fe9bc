// Thin wrappers around the `log` macros so that call sites don't need to be
// sprinkled with `cfg` attributes. Without the `logging` feature the
// arguments are still type checked but nothing is emitted.

macro_rules! debug {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            log::debug!($($tt)*);
        }
        #[cfg(not(feature = "logging"))]
        {
            let _ = format_args!($($tt)*);
        }
    }
}

macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            log::trace!($($tt)*);
        }
        #[cfg(not(feature = "logging"))]
        {
            let _ = format_args!($($tt)*);
        }
    }
}
