mod auth;
mod categories;
mod helpers;
mod products;
mod regions;
