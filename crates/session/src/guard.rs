//! Role-gated navigation.
//!
//! The guard is a pure function over the current identity and the
//! requested view, and it runs on every navigation: roles change only
//! through sign-out and sign-in, never in place, so there is nothing to
//! cache between checks.

use skinmorph_common::{Identity, Role};
use std::fmt;
use tracing::debug;

/// The navigable views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Patient entry view, served at `/`.
    Onboarding,
    Capture,
    Result,
    Timeline,
    Simulator,
    Recommendations,
    Referral,
    ClinicianDashboard,
    Login,
    Signup,
}

impl View {
    pub fn path(self) -> &'static str {
        match self {
            View::Onboarding => "/",
            View::Capture => "/capture",
            View::Result => "/result",
            View::Timeline => "/timeline",
            View::Simulator => "/simulator",
            View::Recommendations => "/recommendations",
            View::Referral => "/referral",
            View::ClinicianDashboard => "/dermatologist/dashboard",
            View::Login => "/login",
            View::Signup => "/signup",
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        match path {
            "/" => Some(View::Onboarding),
            "/capture" => Some(View::Capture),
            "/result" => Some(View::Result),
            "/timeline" => Some(View::Timeline),
            "/simulator" => Some(View::Simulator),
            "/recommendations" => Some(View::Recommendations),
            "/referral" => Some(View::Referral),
            "/dermatologist/dashboard" => Some(View::ClinicianDashboard),
            "/login" => Some(View::Login),
            "/signup" => Some(View::Signup),
            _ => None,
        }
    }

    /// Views reachable without a signed-in identity.
    pub fn is_public(self) -> bool {
        matches!(self, View::Login | View::Signup)
    }

    /// Views reserved for clinician accounts.
    pub fn is_clinician_only(self) -> bool {
        matches!(self, View::ClinicianDashboard)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    RedirectTo(View),
}

/// Decide whether `identity` may open `requested`. Rules are evaluated in
/// order; the first match wins.
pub fn check(identity: Option<&Identity>, requested: View) -> Access {
    let decision = match identity {
        None if !requested.is_public() => Access::RedirectTo(View::Login),
        Some(identity) if identity.role == Role::Clinician && requested == View::Onboarding => {
            Access::RedirectTo(View::ClinicianDashboard)
        }
        Some(identity) if identity.role == Role::Patient && requested.is_clinician_only() => {
            // From the patient's perspective the clinician views do not
            // exist; send them to their own entry view.
            Access::RedirectTo(View::Onboarding)
        }
        _ => Access::Allow,
    };

    debug!(
        "Route check: role {:?} requesting {} -> {:?}",
        identity.map(|identity| identity.role),
        requested.path(),
        decision
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: "u-1".to_string(),
            name: "Ada".to_string(),
            role,
        }
    }

    #[test]
    fn test_unauthenticated_protected_views_redirect_to_login() {
        for view in [
            View::Onboarding,
            View::Capture,
            View::Result,
            View::Timeline,
            View::Simulator,
            View::Recommendations,
            View::Referral,
            View::ClinicianDashboard,
        ] {
            assert_eq!(check(None, view), Access::RedirectTo(View::Login));
        }
    }

    #[test]
    fn test_unauthenticated_public_views_allowed() {
        assert_eq!(check(None, View::Login), Access::Allow);
        assert_eq!(check(None, View::Signup), Access::Allow);
    }

    #[test]
    fn test_clinician_at_patient_entry_redirects_to_dashboard() {
        let clinician = identity(Role::Clinician);
        assert_eq!(
            check(Some(&clinician), View::Onboarding),
            Access::RedirectTo(View::ClinicianDashboard)
        );
        assert_eq!(check(Some(&clinician), View::ClinicianDashboard), Access::Allow);
        assert_eq!(check(Some(&clinician), View::Timeline), Access::Allow);
    }

    #[test]
    fn test_patient_at_clinician_view_redirects_to_entry() {
        let patient = identity(Role::Patient);
        assert_eq!(
            check(Some(&patient), View::ClinicianDashboard),
            Access::RedirectTo(View::Onboarding)
        );
        assert_eq!(check(Some(&patient), View::Onboarding), Access::Allow);
        assert_eq!(check(Some(&patient), View::Capture), Access::Allow);
    }

    #[test]
    fn test_path_roundtrip() {
        for view in [
            View::Onboarding,
            View::Capture,
            View::Result,
            View::Timeline,
            View::Simulator,
            View::Recommendations,
            View::Referral,
            View::ClinicianDashboard,
            View::Login,
            View::Signup,
        ] {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
        assert_eq!(View::from_path("/nope"), None);
    }
}
