pub mod category;
pub mod coverage;
pub mod product;
pub mod region;
pub mod user;
pub mod vendor;

pub use category::*;
pub use coverage::*;
pub use product::*;
pub use region::*;
pub use user::*;
pub use vendor::*;
