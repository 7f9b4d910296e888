pub mod admin;
pub mod extractor;
pub mod hasher;
pub mod jwt;
