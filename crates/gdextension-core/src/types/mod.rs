pub mod enums;
pub mod math;
