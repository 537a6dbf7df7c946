//! Who is playing. The only thing persistence cares about is whether a
//! user id is present.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthSession {
    user_id: Option<String>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Returns true if the identity actually changed. Blank ids are ignored.
    pub fn sign_in(&mut self, user_id: &str) -> bool {
        let user_id = user_id.trim();
        if user_id.is_empty() || self.user_id.as_deref() == Some(user_id) {
            return false;
        }
        self.user_id = Some(user_id.to_string());
        true
    }

    pub fn sign_out(&mut self) -> bool {
        self.user_id.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_anonymous() {
        let auth = AuthSession::anonymous();
        assert!(!auth.is_signed_in());
        assert_eq!(auth.user_id(), None);
    }

    #[test]
    fn sign_in_reports_changes_only() {
        let mut auth = AuthSession::anonymous();
        assert!(auth.sign_in("mei"));
        assert!(!auth.sign_in("mei"));
        assert!(auth.sign_in("kai"));
        assert_eq!(auth.user_id(), Some("kai"));
    }

    #[test]
    fn blank_id_is_rejected() {
        let mut auth = AuthSession::anonymous();
        assert!(!auth.sign_in("   "));
        assert!(!auth.is_signed_in());
    }

    #[test]
    fn sign_out() {
        let mut auth = AuthSession::anonymous();
        assert!(!auth.sign_out());
        auth.sign_in("mei");
        assert!(auth.sign_out());
        assert_eq!(auth.user_id(), None);
    }
}
