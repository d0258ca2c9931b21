pub mod loader;
pub mod persistor;
pub mod scope;
pub mod upgrader;
pub mod version;
