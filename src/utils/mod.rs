pub mod object_url;
pub mod reducer_utils;

pub use object_url::{create_object_url, is_object_url};
pub use reducer_utils::{check_finite, deg_to_rad, parse_number, rad_to_deg};
