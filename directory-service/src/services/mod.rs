pub mod authorizer;
pub mod database;
pub mod keys;
pub mod permission;
pub mod records;
pub mod role_setup;
pub mod token;
