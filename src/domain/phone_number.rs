use std::fmt::Debug;

use phonenumber::{country, Mode};

// Indonesian phone number, stored in E.164 form
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumberDomain(String);

impl PhoneNumberDomain{
    pub fn parse(number: String) -> Result<PhoneNumberDomain, String>{
        let trimmed = number.trim();

        match phonenumber::parse(Some(country::ID), trimmed) {
            Ok(parsed) if phonenumber::is_valid(&parsed) => {
                Ok(Self(parsed.format().mode(Mode::E164).to_string()))
            },
            _ => Err(format!("{} is not a valid Indonesian phone number", trimmed))
        }
    }

    pub fn inner(&self) -> String {
        self.0.clone()
    }
}

impl AsRef<str> for PhoneNumberDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumberDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
