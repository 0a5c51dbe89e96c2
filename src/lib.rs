//! Minimal GDExtension plugins for Godot 4.2.
//!
//! One library, one entry symbol per demo. A `.gdextension` manifest under
//! `demos/` points the engine at the symbol to load:
//!
//! | symbol | demo |
//! |---|---|
//! | `hello_gdextension_entry` | [`demos::hello_gdextension`] |
//! | `hello_proc_address_entry` | [`demos::proc_address`] |
//! | `hello_global_function_entry` | [`demos::global_function`] |
//! | `hello_normal_call_entry` | [`demos::normal_call`] |
//! | `hello_ptrcall_entry` | [`demos::ptrcall`] |
//! | `hello_custom_node_entry` | [`demos::custom_node`] |
//! | `hello_custom_node_with_overrides_entry` | [`demos::custom_node_with_overrides`] |
//!
//! Set `GDEXT_LOG=debug` to see interface resolution and instance churn on
//! stderr.

pub mod demos;
