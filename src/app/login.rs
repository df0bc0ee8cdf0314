use crate::models::{Credentials, ValidationErrors};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub errors: ValidationErrors,
}

impl LoginForm {
    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
        self.clear_focused_error();
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
        self.clear_focused_error();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim().to_string(), self.password.clone())
    }

    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn clear_focused_error(&mut self) {
        match self.focus {
            LoginField::Email => self.errors.email = None,
            LoginField::Password => self.errors.password = None,
        }
    }
}
