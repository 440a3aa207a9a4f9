pub mod checkpoint;
pub mod compare;
