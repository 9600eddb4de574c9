//! Diagnostics for the decoders.
//!
//! With the `logging` feature, messages go to the `log` crate. Without it,
//! the arguments are still evaluated by reference so that call sites compile
//! identically in both configurations.

macro_rules! forward {
    ($level:ident, $fmt:literal $(, $($arg:expr),* $(,)?)?) => {
        #[cfg(feature = "logging")]
        ::log::$level!($fmt $(, $($arg),*)?);
        #[cfg(not(feature = "logging"))]
        { $($(let _ = &$arg;)*)? }
    };
}

/// Progress through rows and refills.
macro_rules! ltrace {
    ($($tokens:tt)*) => {
        $crate::log::forward!(trace, $($tokens)*)
    };
}

/// Decoder setup.
macro_rules! ldebug {
    ($($tokens:tt)*) => {
        $crate::log::forward!(debug, $($tokens)*)
    };
}

/// Recoverable oddities and the cause of decoding failures.
macro_rules! lwarn {
    ($($tokens:tt)*) => {
        $crate::log::forward!(warn, $($tokens)*)
    };
}

pub(crate) use forward;
pub(crate) use ldebug;
pub(crate) use ltrace;
pub(crate) use lwarn;

#[cfg(all(test, not(feature = "logging")))]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_are_evaluated_without_logging() {
        let mut calls = 0;
        let mut count = || {
            calls += 1;
            calls
        };

        ltrace!("plain message");
        ldebug!("value {} and {:?}", count(), [1, 2],);
        lwarn!("value {}", count());

        assert_eq!(calls, 2);
    }
}
