pub mod oficio;
pub mod roster;
