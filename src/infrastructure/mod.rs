pub mod db;
pub mod mirror;
pub mod queue;
