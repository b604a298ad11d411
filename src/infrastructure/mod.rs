pub mod backends;
pub mod speech;
pub mod storage;
