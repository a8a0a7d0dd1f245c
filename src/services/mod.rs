pub mod derivation;
pub mod input_check;
pub mod projection;
