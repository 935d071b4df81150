pub mod a001_cart;
pub mod a002_product;
pub mod a003_post;
pub mod a004_location;
pub mod a005_road;
pub mod a006_route;
