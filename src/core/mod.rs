pub mod auth;
pub mod capture;
pub mod location;
pub mod log;
pub mod navigation;
pub mod permission;
pub mod route;
pub mod tracker;
