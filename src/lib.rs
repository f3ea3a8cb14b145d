//! mkninja core library.
//!
//! Translates a resolved Makefile dependency graph into a Ninja build file
//! and a launcher script that recreates the build environment. The main
//! entry points are [`ninja_gen::generate`] and [`launcher::render`];
//! [`runner`] wires them to the filesystem.

pub mod chain;
pub mod cli;
pub mod config;
pub mod depfile;
pub mod error;
pub mod eval;
pub mod executor;
pub mod expand;
pub mod graph;
pub mod launcher;
pub mod ninja_gen;
pub mod runner;
pub mod shell;
