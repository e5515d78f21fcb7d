mod review;

pub use review::{Review, ReviewRow};
