pub mod coverage;
pub mod new_password;
pub mod phone_number;
pub mod slug;
pub mod user_email;
pub mod user_role;
pub mod verification_status;

pub use coverage::*;
pub use new_password::NewPassword;
pub use phone_number::PhoneNumberDomain;
pub use slug::Slug;
pub use user_email::UserEmail;
pub use user_role::UserRole;
pub use verification_status::VerificationStatus;
