use crate::{
    error::{FieldErrors, BLANK, INVALID_EMAIL, NULL, REQUIRED},
    profiles::{
        dto::ProfilePayload,
        manager::{is_valid_email, normalize_email},
    },
};

pub const EMAIL_MAX_LEN: usize = 255;
pub const NAME_MAX_LEN: usize = 20;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Payload after validation. Email is normalized, name is trimmed and the
/// password is still plaintext.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

/// Checks the payload field by field.
///
/// With `partial` set, absent fields are skipped; otherwise every field is
/// required. An explicit `null` is never accepted. All problems are collected
/// before returning.
pub fn validate(payload: ProfilePayload, partial: bool) -> Result<CleanPayload, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut clean = CleanPayload::default();

    match payload.email {
        None if !partial => errors.add("email", REQUIRED),
        None => {}
        Some(None) => errors.add("email", NULL),
        Some(Some(raw)) => {
            let email = normalize_email(&raw);
            if email.is_empty() {
                errors.add("email", BLANK);
            } else if email.chars().count() > EMAIL_MAX_LEN {
                errors.add("email", too_long(EMAIL_MAX_LEN));
            } else if !is_valid_email(&email) {
                errors.add("email", INVALID_EMAIL);
            } else {
                clean.email = Some(email);
            }
        }
    }

    match payload.name {
        None if !partial => errors.add("name", REQUIRED),
        None => {}
        Some(None) => errors.add("name", NULL),
        Some(Some(raw)) => {
            let name = raw.trim();
            if name.is_empty() {
                errors.add("name", BLANK);
            } else if name.chars().count() > NAME_MAX_LEN {
                errors.add("name", too_long(NAME_MAX_LEN));
            } else {
                clean.name = Some(name.to_string());
            }
        }
    }

    match payload.password {
        None if !partial => errors.add("password", REQUIRED),
        None => {}
        Some(None) => errors.add("password", NULL),
        Some(Some(password)) => {
            if password.trim().is_empty() {
                errors.add("password", BLANK);
            } else if password.chars().count() > PASSWORD_MAX_LEN {
                errors.add("password", too_long(PASSWORD_MAX_LEN));
            } else {
                clean.password = Some(password);
            }
        }
    }

    if errors.is_empty() {
        Ok(clean)
    } else {
        Err(errors)
    }
}
