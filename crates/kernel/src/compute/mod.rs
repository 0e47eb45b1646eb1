pub mod echelon;

pub use echelon::{count_nonzero_rows, echelon_tolerance, row_echelon_form};
