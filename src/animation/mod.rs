pub mod ease;
pub mod effect;
pub mod group;
pub mod keyframes;
pub mod player;
pub mod presets;
pub mod timing;
