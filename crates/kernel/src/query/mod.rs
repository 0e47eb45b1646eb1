pub mod containment;
pub mod parameter;

pub use containment::{is_containing_curve, is_containing_points};
pub use parameter::{parameter_at_point, point_at_parameter};
