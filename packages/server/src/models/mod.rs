pub mod admin;
pub mod asset;
pub mod tree;
