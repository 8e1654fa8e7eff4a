//! Storefront Domain Concerns

pub mod carts;
pub mod catering;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod profiles;
