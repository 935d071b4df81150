pub mod animation;
pub mod api;
pub mod drawer;
pub mod mapbox;
pub mod markers;
pub mod ui;
