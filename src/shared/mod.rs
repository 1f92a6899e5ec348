pub mod element;
pub mod layer;
pub mod scene;
pub mod surface;
