use actix_web::web;

mod authentication;
mod categories;
mod health_check;
mod products;
mod profile;
mod regions;
mod vendor;

pub use authentication::*;
pub use categories::*;
pub use health_check::*;
pub use products::*;
pub use profile::*;
pub use regions::*;
pub use vendor::*;

// Everything mounted under `/api`
pub fn api_config(cfg: &mut web::ServiceConfig){
    cfg.configure(auth_config)
        .configure(categories_config)
        .configure(products_config)
        .configure(vendor_config)
        .configure(profile_config)
        .configure(regions_config);
}
