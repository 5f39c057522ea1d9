//! SFM Core Library
//!
//! This crate provides the core functionality for sfm, a command-line tool
//! that creates, updates, deletes, inspects and waits on infrastructure stacks
//! managed by a remote stack-management service.
//!
//! # Key Features
//!
//! - **Status Classification**: Map raw stack statuses to ok, in-progress or error
//! - **Parameter Reconciliation**: Merge file and inline sources, filter to the
//!   template's declared parameters and carry stored values forward on update
//! - **Create or Update**: One entry point that creates, updates, or deletes and
//!   recreates a stack left behind by a failed create
//! - **Waiting**: Poll a stack until it settles, printing dots or new events
//! - **Error Handling**: Error types for every failure mode, with the remote
//!   cause attached
//!
//! The remote service is reached only through the [`provider::StackProvider`]
//! trait, so everything here can run against an in-memory fake.
//!
//! # Examples
//!
//! Building the parameter set for a template from a file and an inline list:
//!
//! ```no_run
//! use sfm_core::file_handling::{load_key_values, read_template};
//! use sfm_core::reconcile::{reconcile_parameters, Sources};
//!
//! let template = read_template("~/stacks/app.yml")?;
//! let file = load_key_values("~/stacks/prod.yml", "parameter")?;
//! let sources = Sources::new(vec![file], "Env=prod");
//! let parameters = reconcile_parameters(&sources, &template, None);
//! for (key, value) in &parameters {
//!     println!("{key}={value}");
//! }
//! # Ok::<(), sfm_core::error::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod file_handling;
pub mod filter;
pub mod orchestrator;
pub mod provider;
pub mod reconcile;
pub mod render;
pub mod stack;
pub mod status;
pub mod template;
pub mod wait;
