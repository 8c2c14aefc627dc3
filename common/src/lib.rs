pub mod api;
pub mod client;
pub mod crop;
pub mod currency;
pub mod dashboard;
pub mod dates;
pub mod endpoints;
pub mod form;
pub mod market;
pub mod message;
pub mod order;
pub mod payment;
pub mod timing;
pub mod upload;
pub mod user;
