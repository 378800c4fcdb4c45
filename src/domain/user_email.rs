use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq)]
pub struct UserEmail(pub String);

impl UserEmail{
    // Emails are compared case-insensitively, so they are stored lowercased
    pub fn parse(email: String) -> Result<UserEmail, String>{
        let normalized = email.trim().to_lowercase();

        if normalized.validate_email(){
            Ok(Self(normalized))
        } else {
            Err(format!("{} is not a valid email", email))
        }
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
