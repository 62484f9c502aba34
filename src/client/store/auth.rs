//! Auth state: the logged-in user

use crate::shared::models::User;

#[derive(Debug, Default)]
pub struct AuthState {
    user: Option<User>,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        self.user = None;
    }
}
