pub mod agent;
pub mod parser;
pub mod scout;
pub mod tooling;
