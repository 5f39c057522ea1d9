//! SFM CLI Library
//!
//! This crate provides the `sfm` command line tool: a thin, pipe-friendly
//! front end for creating, updating, deleting, waiting on and inspecting
//! CloudFormation stacks.
//!
//! # Architecture
//!
//! - [`cli_args`]: Subcommands and flags
//! - [`commands`]: One module per subcommand, generic over the stack provider
//! - [`template_source`]: Choosing and loading the template for `mk`
//! - [`output`]: Text, YAML and JSON encodings for `stat`
//! - [`aws`]: The CloudFormation and S3 backed provider
//! - [`exit`]: Mapping errors to process exit codes
//!
//! # Examples
//!
//! ```bash
//! # Create a stack and wait for it, printing a dot per poll
//! sfm mk -t stack.yaml --pf params.yaml -p "Env=dev" --wait dots demo
//!
//! # Chain subcommands through pipes
//! sfm mk -t stack.yaml demo | sfm wait --events | sfm stat -o
//!
//! # List stacks matching a glob, with status and timestamps
//! sfm ls -v "demo-*"
//! ```

pub mod aws;
pub mod cli_args;
pub mod commands;
pub mod exit;
pub mod output;
pub mod template_source;
