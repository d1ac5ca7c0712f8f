//! Route guard: pure access decisions the routing layer applies.
//!
//! Given a session snapshot, a guard says whether to render the requested
//! view, hold rendering until startup restore finishes, or send the user
//! elsewhere. No guard touches session state.

use crate::session::SessionSnapshot;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Render the requested view.
    Allow,
    /// Startup restore has not finished; hold rendering.
    Pending,
    /// Send the user elsewhere.
    RedirectTo(&'static str),
}

/// Gate for authenticated views.
pub fn protected(snapshot: &SessionSnapshot) -> Access {
    if snapshot.initializing {
        return Access::Pending;
    }
    if snapshot.authenticated {
        Access::Allow
    } else {
        Access::RedirectTo(LOGIN_PATH)
    }
}

/// Gate for the login/register views; an authenticated user skips straight
/// to the dashboard.
pub fn public_only(snapshot: &SessionSnapshot) -> Access {
    if snapshot.initializing {
        return Access::Pending;
    }
    if snapshot.authenticated {
        Access::RedirectTo(DASHBOARD_PATH)
    } else {
        Access::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(authenticated: bool, initializing: bool) -> SessionSnapshot {
        SessionSnapshot {
            authenticated,
            user: None,
            initializing,
            request_in_flight: false,
        }
    }

    #[test]
    fn test_protected_waits_for_restore() {
        assert_eq!(protected(&snapshot(false, true)), Access::Pending);
        assert_eq!(protected(&snapshot(true, true)), Access::Pending);
    }

    #[test]
    fn test_protected_redirects_anonymous() {
        assert_eq!(
            protected(&snapshot(false, false)),
            Access::RedirectTo(LOGIN_PATH)
        );
        assert_eq!(protected(&snapshot(true, false)), Access::Allow);
    }

    #[test]
    fn test_public_only_redirects_authenticated() {
        assert_eq!(public_only(&snapshot(false, false)), Access::Allow);
        assert_eq!(
            public_only(&snapshot(true, false)),
            Access::RedirectTo(DASHBOARD_PATH)
        );
    }
}
