//! Registry of tool descriptors.

use crate::descriptor::ToolDescriptor;
use crate::error::RegistryError;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory table of tool descriptors.
///
/// Populated at startup, then shared read-only. Cloning shares the table.
#[derive(Default, Clone)]
pub struct DescriptorRegistry {
    /// Map of tool name to descriptor.
    tools: Arc<RwLock<HashMap<String, Arc<ToolDescriptor>>>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its tool name.
    pub fn register(&self, descriptor: Arc<ToolDescriptor>) -> Result<(), RegistryError> {
        let mut tools = self.tools.write();
        if tools.contains_key(&descriptor.tool_name) {
            return Err(RegistryError::DuplicateTool(descriptor.tool_name.clone()));
        }
        debug!(
            "registering tool descriptor (name={}, target={}, params={})",
            descriptor.tool_name,
            descriptor.execute_name,
            descriptor.parameters.len()
        );
        tools.insert(descriptor.tool_name.clone(), descriptor);
        Ok(())
    }

    /// Fetch a descriptor by tool name or remote execute name.
    pub fn describe(&self, name: &str) -> Option<Arc<ToolDescriptor>> {
        let tools = self.tools.read();
        tools.get(name).cloned().or_else(|| {
            tools
                .values()
                .find(|descriptor| descriptor.execute_name == name)
                .cloned()
        })
    }

    /// Registered tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names = self.tools.read().keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn all(&self) -> Vec<Arc<ToolDescriptor>> {
        self.tools.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

impl std::fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorRegistry")
            .field("tools", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::DescriptorRegistry;
    use crate::descriptor::ToolDescriptor;
    use crate::error::RegistryError;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn descriptor(name: &str) -> Arc<ToolDescriptor> {
        Arc::new(
            ToolDescriptor::builder(name, "na")
                .build()
                .expect("descriptor"),
        )
    }

    #[test]
    fn registry_tracks_descriptors() {
        let registry = DescriptorRegistry::new();
        registry.register(descriptor("Solve")).expect("register");
        registry.register(descriptor("AddLocations")).expect("register");

        assert_eq!(registry.list(), vec!["AddLocations", "Solve"]);
        assert_eq!(registry.len(), 2);
        let by_target = registry.describe("Solve_na").expect("by execute name");
        assert_eq!(by_target.tool_name, "Solve");
        assert!(registry.describe("Missing").is_none());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = DescriptorRegistry::new();
        registry.register(descriptor("Solve")).expect("register");
        let err = registry.register(descriptor("Solve")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("Solve".to_string()));
    }

    #[test]
    fn clones_share_the_table() {
        let registry = DescriptorRegistry::new();
        let shared = registry.clone();
        registry.register(descriptor("Solve")).expect("register");
        assert!(shared.describe("Solve").is_some());
    }
}
