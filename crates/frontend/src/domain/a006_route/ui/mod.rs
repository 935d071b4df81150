pub mod map_view;
pub mod route_form;
pub mod route_panel;
