pub mod mood;
pub mod pet;
pub mod user;
