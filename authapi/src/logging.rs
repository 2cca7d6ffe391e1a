use tracing::Level;

/// The levels at which AuthApi components report their outcomes
///
/// Successful operations are reported at `INFO` and failures at `ERROR`
/// unless configured otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogLevels {
    success: Level,
    failure: Level,
}

impl Default for LogLevels {
    fn default() -> Self {
        Self {
            success: Level::INFO,
            failure: Level::ERROR,
        }
    }
}

impl LogLevels {
    /// Constructs a new set of log levels
    pub const fn new(success: Level, failure: Level) -> Self {
        Self { success, failure }
    }

    /// Sets the level used for successful operations
    pub fn with_success(mut self, success: Level) -> Self {
        self.success = success;
        self
    }

    /// Sets the level used for failed operations
    pub fn with_failure(mut self, failure: Level) -> Self {
        self.failure = failure;
        self
    }

    /// The level used for successful operations
    #[inline]
    pub const fn success(&self) -> Level {
        self.success
    }

    /// The level used for failed operations
    #[inline]
    pub const fn failure(&self) -> Level {
        self.failure
    }
}

/// Emits a `tracing` event at a level chosen at runtime
#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {{
        let level: $crate::__private::tracing::Level = $level;
        if level == $crate::__private::tracing::Level::ERROR {
            $crate::__private::tracing::error!($($arg)+)
        } else if level == $crate::__private::tracing::Level::WARN {
            $crate::__private::tracing::warn!($($arg)+)
        } else if level == $crate::__private::tracing::Level::INFO {
            $crate::__private::tracing::info!($($arg)+)
        } else if level == $crate::__private::tracing::Level::DEBUG {
            $crate::__private::tracing::debug!($($arg)+)
        } else {
            $crate::__private::tracing::trace!($($arg)+)
        }
    }};
}
