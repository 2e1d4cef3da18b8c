use std::sync::Arc;

use bookstore_kernel::ModuleRegistry;

use crate::modules::books::store::BookStore;

pub mod books;

/// Register all application modules with the registry.
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>) {
    registry.register(books::create_module(store));
}
