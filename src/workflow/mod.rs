pub mod commit;
pub mod draft;
pub mod publish;
pub mod start;
pub mod verify;

#[cfg(test)]
mod fakes;
