pub mod gaze_log;

pub use gaze_log::{GazeLog, GazeLogParseError, parse_gaze_log};
