//! Registers `MyCustomNode` as a `Sprite2D` that bobs up and down.
//!
//! The class exposes two float properties, `frequency` and `amplitude`, and
//! overrides `_process`. Every frame it accumulates the elapsed time `t` and
//! moves itself to `(0, amplitude * sin(frequency * t))` by ptr-calling
//! `Node2D.set_position`.

use gdextension_core::prelude::*;
use gdextension_core::sys::{GDExtensionConstTypePtr, GDExtensionTypePtr};
use std::sync::OnceLock;

pub const CLASS_NAME: &str = "MyCustomNode";
pub const PARENT_CLASS: &str = "Sprite2D";

/// Signature hash of `void Node2D.set_position(Vector2)`.
pub const SET_POSITION_HASH: i64 = 743155724;

pub const DEFAULT_AMPLITUDE: f64 = 1.23;
pub const DEFAULT_FREQUENCY: f64 = 2.45;

// Resolved at scene initialization, before any instance can exist.
static SET_POSITION: OnceLock<MethodBind> = OnceLock::new();

fn set_position_bind() -> GdResult<MethodBind> {
    if let Some(bind) = SET_POSITION.get() {
        return Ok(*bind);
    }
    let bind = MethodBind::get("Node2D", "set_position", SET_POSITION_HASH)?;
    Ok(*SET_POSITION.get_or_init(|| bind))
}

/// Where the node sits after `time_elapsed` seconds.
pub fn position_at(amplitude: f64, frequency: f64, time_elapsed: f64) -> Vector2 {
    Vector2::from_f64(0.0, amplitude * (frequency * time_elapsed).sin())
}

pub struct MyCustomNode {
    base: Object,
    time_elapsed: f64,
    amplitude: f64,
    frequency: f64,
}

impl MyCustomNode {
    pub fn time_elapsed(&self) -> f64 {
        self.time_elapsed
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn process(&mut self, delta: f64) -> GdResult<()> {
        self.time_elapsed += delta;
        let position = position_at(self.amplitude, self.frequency, self.time_elapsed);

        let args = [&position as *const Vector2 as GDExtensionConstTypePtr];
        let set_position = set_position_bind()?;
        unsafe { set_position.ptrcall(self.base, &args, std::ptr::null_mut()) }
    }
}

impl ExtensionClass for MyCustomNode {
    const NAME: &'static str = CLASS_NAME;
    const PARENT: &'static str = PARENT_CLASS;
    const PROPERTIES: &'static [PropertyDef] = &[
        PropertyDef::new("frequency", VariantType::Float),
        PropertyDef::new("amplitude", VariantType::Float),
    ];
    const VIRTUALS: &'static [&'static str] = &["_process"];

    fn init(base: Object) -> Self {
        println!("Hey, instancing is done!");
        Self {
            base,
            time_elapsed: 0.0,
            amplitude: DEFAULT_AMPLITUDE,
            frequency: DEFAULT_FREQUENCY,
        }
    }

    fn set_property(&mut self, name: &str, value: &Variant) -> GdResult<bool> {
        match name {
            "frequency" => self.frequency = value.to_f64()?,
            "amplitude" => self.amplitude = value.to_f64()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn get_property(&self, name: &str) -> GdResult<Option<Variant>> {
        match name {
            "frequency" => Variant::from_f64(self.frequency).map(Some),
            "amplitude" => Variant::from_f64(self.amplitude).map(Some),
            _ => Ok(None),
        }
    }

    fn call_virtual(&mut self, name: &str, args: VirtualArgs<'_>, _ret: GDExtensionTypePtr) -> GdResult<()> {
        match name {
            "_process" => {
                let delta: f64 = unsafe { args.arg(0) };
                self.process(delta)
            }
            _ => Ok(()),
        }
    }
}

impl Drop for MyCustomNode {
    fn drop(&mut self) {
        println!("my_custom_class is going down, goodbye world!");
    }
}

#[derive(Default)]
pub struct CustomNodeWithOverrides {
    registration: Option<ClassRegistration>,
}

impl Extension for CustomNodeWithOverrides {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        Ok(Self::default())
    }

    fn initialize(&mut self, level: InitLevel, library: ClassLibrary) -> GdResult<()> {
        if level == InitLevel::Scene {
            set_position_bind()?;
            self.registration = Some(ClassRegistration::register::<MyCustomNode>(library)?);
        }
        Ok(())
    }

    fn deinitialize(&mut self, level: InitLevel) -> GdResult<()> {
        if level != InitLevel::Scene {
            return Ok(());
        }
        match self.registration.take() {
            Some(registration) => registration.unregister(),
            None => Ok(()),
        }
    }
}

export_extension!(hello_custom_node_with_overrides_entry => CustomNodeWithOverrides);
