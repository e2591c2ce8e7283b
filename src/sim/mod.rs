pub mod event;
pub mod layout;
pub mod save;
pub mod step;
pub mod world;
