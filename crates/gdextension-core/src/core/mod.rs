pub mod class;
pub mod error;
pub mod extension;
pub mod gstring;
pub mod interface;
pub mod method_bind;
pub mod object;
pub mod property;
pub mod string_name;
pub mod utility;
pub mod variant;
pub mod version;
