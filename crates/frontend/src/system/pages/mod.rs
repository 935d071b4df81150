pub mod account_setting;
pub mod login;
pub mod register;
