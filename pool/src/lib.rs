pub mod entity;
pub mod host;
pub mod manager;
pub mod settings;
