pub mod credentials;
pub mod db;
pub mod entities;
pub mod error;
pub mod services;
