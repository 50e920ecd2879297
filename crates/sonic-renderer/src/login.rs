//! Login state for the current session.

use std::collections::HashSet;

/// Class applied to a page on its first visit.
pub const PAGE_ANIMATION: &str = "slide-in-right";

#[derive(Debug, Default)]
pub struct LoginCounter {
    pub is_logged_in: bool,
    pub wallet_active: bool,
    pub login_failed: bool,
    visited: HashSet<String>,
}

impl LoginCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.is_logged_in = logged_in;
        if logged_in {
            self.login_failed = false;
        }
    }

    pub fn set_login_failed(&mut self) {
        self.is_logged_in = false;
        self.login_failed = true;
    }

    pub fn set_wallet_active(&mut self, active: bool) {
        self.wallet_active = active;
    }

    /// Logged in with a wallet the backend reports open.
    pub fn is_ready(&self) -> bool {
        self.is_logged_in && self.wallet_active
    }

    /// Animation for `route`: set on the first visit only.
    pub fn animation(&mut self, route: &str) -> Option<&'static str> {
        self.visited.insert(route.to_string()).then_some(PAGE_ANIMATION)
    }
}
