//! Draft state for the account settings form.

use taskboard_shared::{Credentials, UpdateProfileRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    Email,
    OldPassword,
    NewPassword,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            SettingsField::Name => SettingsField::Email,
            SettingsField::Email => SettingsField::OldPassword,
            SettingsField::OldPassword => SettingsField::NewPassword,
            SettingsField::NewPassword => SettingsField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            SettingsField::Name => SettingsField::NewPassword,
            SettingsField::Email => SettingsField::Name,
            SettingsField::OldPassword => SettingsField::Email,
            SettingsField::NewPassword => SettingsField::OldPassword,
        }
    }
}

/// Profile draft seeded from the current session; password fields start
/// empty. Submitted atomically as one update request.
pub struct SettingsDraft {
    pub name: String,
    pub email: String,
    pub old_password: String,
    pub new_password: String,

    pub field: SettingsField,
    pub pending: bool,
}

impl SettingsDraft {
    pub fn seed(creds: Option<&Credentials>) -> Self {
        Self {
            name: creds.map(|c| c.name.clone()).unwrap_or_default(),
            email: creds.map(|c| c.email.clone()).unwrap_or_default(),
            old_password: String::new(),
            new_password: String::new(),
            field: SettingsField::Name,
            pending: false,
        }
    }

    pub fn payload(&self) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            current_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
        }
    }

    pub fn active_input(&mut self) -> &mut String {
        match self.field {
            SettingsField::Name => &mut self.name,
            SettingsField::Email => &mut self.email,
            SettingsField::OldPassword => &mut self.old_password,
            SettingsField::NewPassword => &mut self.new_password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_name_and_email_from_session_with_empty_passwords() {
        let creds = Credentials {
            name: "Riya".into(),
            email: "riya@example.com".into(),
            token: "tok".into(),
        };

        let draft = SettingsDraft::seed(Some(&creds));

        assert_eq!(draft.name, "Riya");
        assert_eq!(draft.email, "riya@example.com");
        assert!(draft.old_password.is_empty());
        assert!(draft.new_password.is_empty());
    }

    #[test]
    fn payload_carries_all_four_fields() {
        let mut draft = SettingsDraft::seed(None);
        draft.name = "New Name".into();
        draft.email = "new@example.com".into();
        draft.old_password = "old".into();
        draft.new_password = "new".into();

        assert_eq!(
            draft.payload(),
            UpdateProfileRequest {
                name: "New Name".into(),
                email: "new@example.com".into(),
                current_password: "old".into(),
                new_password: "new".into(),
            }
        );
    }

    #[test]
    fn field_cycle_is_a_loop() {
        let mut field = SettingsField::Name;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, SettingsField::Name);
        assert_eq!(SettingsField::Name.prev(), SettingsField::NewPassword);
    }
}
