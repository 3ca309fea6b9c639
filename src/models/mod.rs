pub mod coordinates;
pub mod punch_in;
pub mod session;
