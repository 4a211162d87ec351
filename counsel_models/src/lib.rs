pub mod contact;
pub mod news;
mod macros;
