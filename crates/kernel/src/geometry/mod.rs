pub mod bbox;
pub mod curves;
pub mod intersection;
pub mod plane;
pub mod point;
pub mod vector;
