//! studiodb - a deterministic, in-process relational stand-in for a studio's
//! hosted SQL database
//!
//! The engine interprets the fixed set of statement shapes the admin
//! application issues, enforces the relational invariants the hosted backend
//! would otherwise guarantee, and repairs student records written under
//! earlier schema generations.

pub mod cli;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod normalize;
pub mod observability;
pub mod project;
pub mod statement;
pub mod store;
