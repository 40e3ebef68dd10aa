pub mod params;
pub mod scheduler;
pub mod time;
