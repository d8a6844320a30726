pub mod billing;
pub mod email;
pub mod factory;
pub mod forge;
pub mod hosting;
pub mod http;
pub mod repositories;
pub mod restaurant;
