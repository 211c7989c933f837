pub mod config;
pub mod context;
pub mod cursor;
pub mod deletion;
pub mod library;
pub mod mode;
pub mod note;
pub mod route;
pub mod sidebar;
pub mod window;
