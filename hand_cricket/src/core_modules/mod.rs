pub mod contour;
pub mod defect;
pub mod gesture_decoder;
pub mod hull;
pub mod intensity;
pub mod region;
pub mod utils;
