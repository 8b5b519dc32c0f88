use wozway_core::hooks::Hooks;

/// Registers the SDK's own hooks. Runs once per client build, before any
/// hooks added through `WozwayBuilder::configure_hooks`.
pub fn register_hooks(_hooks: &mut dyn Hooks) {}
