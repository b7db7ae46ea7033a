pub mod branch;
pub mod change;
pub mod commit;
pub mod pull_request;
pub mod step;
pub mod ticket;
pub mod verification;
