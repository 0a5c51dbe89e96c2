pub mod custom_node;
pub mod custom_node_with_overrides;
pub mod global_function;
pub mod hello_gdextension;
pub mod normal_call;
pub mod proc_address;
pub mod ptrcall;
