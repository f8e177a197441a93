pub mod domain;
pub mod link;
pub mod poller;
pub mod subscriber;
