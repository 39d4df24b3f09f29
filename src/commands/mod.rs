pub mod links;
pub mod resolve;
pub mod run;
