pub mod boxes;
pub mod user;
