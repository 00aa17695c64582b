mod enums;
mod from_row;
mod structs;


pub use enums::{EnumParseError, Role};
pub use structs::{Group, Permission, User};
