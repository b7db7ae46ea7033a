pub mod check;
pub mod commit;
pub mod config;
pub mod draft;
pub mod guide;
pub mod parse;
pub mod pr;
pub mod start;
pub mod verify;
