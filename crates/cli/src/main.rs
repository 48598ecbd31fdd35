use anyhow::Result;
use clap::{Parser, Subcommand};
use funcviz::commands::{
    dot_command, init_config_command, list_command, render_command, InputArgs, StyleArgs,
};
use funcviz_core::project::DEFAULT_CONFIG_FILE;

/// Serverless function binding visualizer.
///
/// This CLI is a thin wrapper around `funcviz-core` (exposed in code as `funcviz_core`).
/// Discovery, parsing and graph building live in the library so they can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "funcviz",
    version,
    about = "Draw serverless function triggers, inputs and outputs as a Graphviz graph",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the dependency graph as DOT text.
    ///
    /// Every `function.json` under the input is a function; resources shared
    /// between functions (same queue, blob path, table, ...) become one node.
    Dot {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Output DOT file, or `-` for stdout.
        #[arg(long, default_value = "output.dot")]
        output: String,
    },

    /// Build the graph and render it to an image with Graphviz `dot`.
    ///
    /// The renderer is taken from the config's `renderer.dot_path`, then
    /// `FUNCVIZ_DOT_BIN`, then `dot` on PATH.
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Graphviz output format (e.g. svg, png). Defaults to the config's `renderer.format`.
        #[arg(long)]
        format: Option<String>,

        /// Output image path. Defaults to `output.<format>`.
        #[arg(long)]
        output: Option<String>,

        /// Also keep the intermediate DOT file at this path.
        #[arg(long)]
        keep_dot: Option<String>,
    },

    /// List discovered functions, their bindings and the nodes they map to.
    List {
        #[command(flatten)]
        input: InputArgs,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write a visualizer config file with every setting at its default.
    InitConfig {
        /// Config path; `.yaml`/`.yml` writes YAML, anything else JSON.
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: String,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    // With no subcommand, write `output.dot` for the current directory.
    let command = cli.command.unwrap_or(Command::Dot {
        input: InputArgs::default(),
        style: StyleArgs::default(),
        output: "output.dot".to_string(),
    });

    match command {
        Command::Dot { input, style, output } => dot_command(&input, &style, &output)?,
        Command::Render { input, style, format, output, keep_dot } => render_command(
            &input,
            &style,
            format.as_deref(),
            output.as_deref(),
            keep_dot.as_deref(),
        )?,
        Command::List { input, json } => list_command(&input, json)?,
        Command::InitConfig { path, force } => init_config_command(&path, force)?,
    }

    Ok(())
}
