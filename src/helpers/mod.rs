pub mod layout;
pub mod pdf;
pub mod roster;
