use secrecy::{ExposeSecret, SecretString};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

// A password chosen by the user, checked against its confirmation
#[derive(Debug)]
pub struct NewPassword(SecretString);

impl NewPassword {
    pub fn parse(password: SecretString, confirm_password: &SecretString) -> Result<NewPassword, String>{
        let length = password.expose_secret().chars().count();

        if password.expose_secret() != confirm_password.expose_secret(){
            return Err("the password and confirm password don't match".to_string())
        }

        if length < MIN_PASSWORD_LENGTH || length > MAX_PASSWORD_LENGTH {
            return Err(format!(
                "password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH,
                MAX_PASSWORD_LENGTH
            ))
        }

        Ok(Self(password))
    }

    pub fn into_secret(self) -> SecretString{
        self.0
    }
}
