pub mod events;
pub mod gesture;
pub mod machine;
pub mod screen;
pub mod transition;
