pub mod observer;
pub mod overlay;
pub mod preprocessing;
pub mod roads;
pub mod validation;
