pub mod command;
pub mod cursor;
pub mod linking;
pub mod mapping;
