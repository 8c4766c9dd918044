
mod admin;
mod upload;
