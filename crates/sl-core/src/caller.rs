//! Source location of a logging call.

use std::panic::Location;

/// File, line and (when known) function of the logging call site.
///
/// Direct calls capture file and line through `#[track_caller]`; Rust has no
/// stable way to name the enclosing function, so `function` is only set when
/// the caller supplies it (the tracing bridge passes the module path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    pub function: Option<&'static str>,
}

impl Caller {
    /// The location of the outermost `#[track_caller]` frame.
    #[track_caller]
    pub fn here() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Caller {
            file: location.file(),
            line: location.line(),
            function: None,
        }
    }

    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }
}
