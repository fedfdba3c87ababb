pub mod db;
pub mod routing;
