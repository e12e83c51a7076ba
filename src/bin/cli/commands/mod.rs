pub mod add;
pub mod due;
pub mod import;
pub mod preview;
pub mod register;
pub mod review;
pub mod stats;
