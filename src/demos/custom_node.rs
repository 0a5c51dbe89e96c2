//! Registers `MyCustomNode`, an empty subclass of `Node`.

use gdextension_core::prelude::*;

pub const CLASS_NAME: &str = "MyCustomNode";
pub const PARENT_CLASS: &str = "Node";

pub struct MyCustomNode {
    base: Object,
}

impl MyCustomNode {
    pub fn base(&self) -> Object {
        self.base
    }
}

impl ExtensionClass for MyCustomNode {
    const NAME: &'static str = CLASS_NAME;
    const PARENT: &'static str = PARENT_CLASS;

    fn init(base: Object) -> Self {
        println!("Hey, instancing is done!");
        Self { base }
    }
}

impl Drop for MyCustomNode {
    fn drop(&mut self) {
        println!("my_custom_class is going down, goodbye world!");
    }
}

#[derive(Default)]
pub struct CustomNode {
    registration: Option<ClassRegistration>,
}

impl Extension for CustomNode {
    fn load(_library: ClassLibrary) -> GdResult<Self> {
        Ok(Self::default())
    }

    // Node is only in ClassDB from the scene level on.
    fn initialize(&mut self, level: InitLevel, library: ClassLibrary) -> GdResult<()> {
        if level == InitLevel::Scene {
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

export_extension!(hello_custom_node_entry => CustomNode);
