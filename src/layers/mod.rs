pub mod base;
pub mod icon;
pub mod marker;
pub mod visual;
