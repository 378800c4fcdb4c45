pub mod errors;
pub mod extractors;
pub mod jwt;
pub mod permissions;

pub use errors::AuthError;
pub use extractors::AuthenticatedUser;
pub use jwt::{Claims, TokenPair, TokenType, Tokenizer};
pub use permissions::{can_access_resource, has_permission, role_permissions, Permission};
