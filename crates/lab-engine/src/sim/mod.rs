pub mod model;
pub mod free_fall;
pub mod pendulum;
pub mod projectile;
pub mod titration;
pub mod circuit;
