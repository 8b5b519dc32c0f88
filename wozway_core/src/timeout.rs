use core::time::Duration;

/// Per-request override of the client timeout.
///
/// - `Inherit`: keep the client timeout.
/// - `Clear`: no timeout for this request.
/// - `Set(d)`: force `d` for this request.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum TimeoutOverride {
    #[default]
    Inherit,
    Clear,
    Set(Duration),
}

impl TimeoutOverride {
    #[inline]
    pub fn resolve(self, client: Option<Duration>) -> Option<Duration> {
        match self {
            TimeoutOverride::Inherit => client,
            TimeoutOverride::Clear => None,
            TimeoutOverride::Set(d) => Some(d),
        }
    }
}
