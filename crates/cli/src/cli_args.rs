//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate: global flags on [`Args`] and one argument struct per subcommand.

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use sfm_core::wait::RenderMode;

/// Command-line arguments for the sfm CLI tool.
///
/// sfm is sugar for managing stacks, improving the experience in scripts and
/// in interactive sessions. Output is tab-separated key/value pairs by default,
/// which integrates well with `cut` and `column`.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use sfm_cli::cli_args::Args;
///
/// let args = Args::parse_from(["sfm", "-r", "eu-west-1", "ls", "app-*"]);
/// assert_eq!(args.region.as_deref(), Some("eu-west-1"));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "sfm", version, about, term_width = 0)]
pub struct Args {
    /// Region to operate in.
    ///
    /// If not provided, `AWS_REGION` then `AWS_DEFAULT_REGION` are used.
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// Print events without colors.
    ///
    /// Colors are also disabled when `NO_COLOR` is set.
    #[arg(long, global = true, action)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stacks
    Ls(ListArgs),
    /// Create or update a stack
    Mk(MakeArgs),
    /// Delete a stack
    Rm(RemoveArgs),
    /// Block on a stack while it is in progress
    Wait(WaitArgs),
    /// Print information about a stack
    Stat(StatArgs),
}

/// How to report progress while blocking on an operation.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitStyle {
    Dots,
    Events,
}

impl From<WaitStyle> for RenderMode {
    fn from(style: WaitStyle) -> Self {
        match style {
            WaitStyle::Dots => RenderMode::Dots,
            WaitStyle::Events => RenderMode::Events,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Tab-separated key/value lines
    #[default]
    Text,
    #[value(alias = "yml")]
    Yaml,
    Json,
}

#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Print the latest change time, the name and the status.
    #[arg(long, short = 'v', action)]
    pub verbose: bool,

    /// Filter stack names by a glob (`*`, `?`, `[...]`).
    #[arg(default_value = "*")]
    pub glob: String,
}

#[derive(ClapArgs, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct MakeArgs {
    /// Template path or `s3://bucket/key` URI.
    ///
    /// The template can also be passed in via stdin.
    #[arg(long, short = 't')]
    pub template: Option<String>,

    /// Parameters as `k1=v1,k2=v2`. These override parameter files.
    #[arg(long = "params", short = 'p', default_value = "")]
    pub parameters: String,

    /// YAML or JSON file of parameters.
    ///
    /// Can be repeated; files are applied in order and later keys win.
    #[arg(long = "pf", action = ArgAction::Append)]
    pub parameter_files: Vec<String>,

    /// Tags as `k1=v1,k2=v2`. These override the tags file.
    #[arg(long, default_value = "")]
    pub tags: String,

    /// YAML or JSON file of tags.
    #[arg(long = "tagsfile")]
    pub tags_file: Option<String>,

    /// Comma-separated notification topic ARNs.
    #[arg(long = "sns", default_value = "")]
    pub notification_topics: String,

    /// Do not roll back a stack that fails to create.
    #[arg(long = "norb", action)]
    pub disable_rollback: bool,

    /// Block on the operation.
    #[arg(long, value_enum)]
    pub wait: Option<WaitStyle>,

    /// The name of the stack.
    pub name: String,
}

impl MakeArgs {
    /// Topic ARNs from `--sns`, empty segments dropped.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        self.notification_topics
            .split(',')
            .filter(|arn| !arn.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[derive(ClapArgs, Debug)]
pub struct RemoveArgs {
    /// Remove stacks with non-empty buckets. Not implemented.
    #[arg(long, action)]
    pub force: bool,

    /// Block on the operation.
    #[arg(long, value_enum)]
    pub wait: Option<WaitStyle>,

    /// The name of the stack to delete.
    pub name: String,
}

#[derive(ClapArgs, Debug)]
pub struct WaitArgs {
    /// Print dots periodically while waiting.
    #[arg(long, action, conflicts_with = "events")]
    pub dots: bool,

    /// Print stack events while waiting.
    #[arg(long, action)]
    pub events: bool,

    /// The stack to wait on. Read from stdin when piped.
    pub name: Option<String>,
}

impl WaitArgs {
    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        if self.dots {
            RenderMode::Dots
        } else if self.events {
            RenderMode::Events
        } else {
            RenderMode::None
        }
    }
}

/// What `stat` prints instead of the whole stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    Outputs,
    Parameters,
    Tags,
    Resources,
}

#[derive(ClapArgs, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct StatArgs {
    /// Print stack outputs.
    #[arg(short = 'o', action, conflicts_with_all = ["parameters", "tags", "resources"])]
    pub outputs: bool,

    /// Print stack parameters.
    #[arg(short = 'p', action, conflicts_with_all = ["tags", "resources"])]
    pub parameters: bool,

    /// Print stack tags.
    #[arg(short = 't', action, conflicts_with = "resources")]
    pub tags: bool,

    /// Print stack resources (logical and physical ids).
    #[arg(short = 'r', action)]
    pub resources: bool,

    /// Output encoding.
    #[arg(short = 'e', value_enum, default_value_t = Encoding::Text)]
    pub encoding: Encoding,

    /// The stack to describe. Read from stdin when piped.
    pub name: Option<String>,
}

impl StatArgs {
    #[must_use]
    pub fn selector(&self) -> Option<Selector> {
        [
            (self.outputs, Selector::Outputs),
            (self.parameters, Selector::Parameters),
            (self.tags, Selector::Tags),
            (self.resources, Selector::Resources),
        ]
        .into_iter()
        .find_map(|(set, selector)| set.then_some(selector))
    }
}
