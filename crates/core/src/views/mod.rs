pub mod figure;
pub mod time_axis;
pub mod timeline;
