// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pmo_engine::editor::{
    self, Editor, EditorHooks, FileStorage, LoadSource, NodeType, Position, template_graph,
};
use pmo_engine::{AtlasConfig, Catalog, ConnectorStyle, SearchIndex, assess_raw, lookup_phase};
use pmo_engine::{export, pages};

const DEFAULT_STORE_DIR: &str = ".pmo";

/// Browse, render and edit the PMO project lifecycle.
#[derive(Debug, Parser)]
#[command(name = "pmo", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a phase or exception state.
    Phase {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Classify a request from its three criteria scores.
    Score {
        impact: u8,
        reach: u8,
        investment: u8,
    },
    /// Search pages, FAQ entries and phases.
    Search {
        query: Vec<String>,
        /// Write the results as an HTML page.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Report track entries with no phase record.
    Check,
    /// Render the lifecycle diagram as SVG.
    Render {
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write the static HTML site.
    Site {
        #[arg(long)]
        out: PathBuf,
    },
    #[command(subcommand)]
    Export(ExportCommand),
    #[command(subcommand)]
    Editor(EditorCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleArg {
    Fixed,
    Anchored,
}

impl From<StyleArg> for ConnectorStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Fixed => ConnectorStyle::Fixed,
            StyleArg::Anchored => ConnectorStyle::Anchored,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ExportCommand {
    /// RACI roll-up as CSV.
    Raci {
        #[arg(long, short, default_value = "raci.csv")]
        output: PathBuf,
    },
    /// One phase as CRLF text, e.g. for a .doc file.
    Phase {
        id: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// The lifecycle diagram as PNG.
    Png {
        #[arg(long, short, default_value = "lifecycle.png")]
        output: PathBuf,
        #[arg(long)]
        width: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
enum EditorCommand {
    /// Print the stored diagram as JSON.
    Show,
    /// Replace the stored diagram with the template.
    Reset,
    AddNode {
        label: String,
        #[arg(long = "type", default_value = "note")]
        node_type: NodeType,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
    },
    Connect {
        source: String,
        target: String,
        #[arg(long)]
        label: Option<String>,
    },
    /// Set a node's label, or an edge's label with `--edge`.
    Label {
        id: String,
        text: String,
        #[arg(long)]
        edge: bool,
    },
    /// Delete a node (and its edges) or an edge.
    Delete { id: String },
    Move { id: String, x: f64, y: f64 },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<AtlasConfig> {
    match path {
        Some(path) => AtlasConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(AtlasConfig::default()),
    }
}

fn print_phase(catalog: &Catalog, id: &str, json: bool) -> Result<()> {
    let record = lookup_phase(catalog, id);
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", export::phase_text(&record).replace("\r\n", "\n"));
    }
    if record.placeholder {
        bail!("no phase with id '{id}'");
    }
    Ok(())
}

fn check(catalog: &Catalog) -> Result<()> {
    let dangling = catalog.dangling_references();
    if dangling.is_empty() {
        println!(
            "ok: {} phases, {} exception states, {} tracks",
            catalog.phases.len(),
            catalog.exceptions.len(),
            catalog.tracks.len()
        );
        return Ok(());
    }
    for (track, id) in &dangling {
        println!("{track}: no phase record for '{id}'");
    }
    bail!("{} dangling phase reference(s)", dangling.len())
}

fn search(catalog: &Catalog, query: &[String], html: Option<&Path>) -> Result<()> {
    let query = query.join(" ");
    let index = SearchIndex::build(catalog);
    let results = index.search(&query);
    if let Some(path) = html {
        let page = pages::search_page(catalog, &query, &results);
        std::fs::write(path, page.html).with_context(|| format!("writing {}", path.display()))?;
    }
    for entry in &results {
        println!("{:<8} {:<48} {}", format!("{:?}", entry.entry_type).to_lowercase(), entry.title, entry.url);
    }
    if results.is_empty() {
        eprintln!("no results for '{query}'");
    }
    Ok(())
}

fn export_cmd(catalog: &Catalog, config: &AtlasConfig, cmd: ExportCommand) -> Result<()> {
    match cmd {
        ExportCommand::Raci { output } => export::write_raci_csv(&output, catalog)?,
        ExportCommand::Phase { id, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(format!("phase-{id}.doc")));
            export::write_phase_text(&output, catalog, &id)?;
        }
        #[cfg(feature = "png_render")]
        ExportCommand::Png { output, width } => {
            let opts = pmo_engine::diagram::render_png::PngRenderOpts { width, height: None };
            export::write_png(&output, catalog, &config.layout, &config.overlay, &opts)?;
        }
        #[cfg(not(feature = "png_render"))]
        ExportCommand::Png { .. } => {
            let _ = config;
            bail!("PNG export needs a build with the png_render feature");
        }
    }
    Ok(())
}

fn store(config: &AtlasConfig) -> FileStorage {
    let dir = config
        .editor
        .storage_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
    FileStorage::new(dir)
}

fn editor_cmd(catalog: &Catalog, config: &AtlasConfig, cmd: EditorCommand) -> Result<()> {
    let mut storage = store(config);
    let key = config.editor.storage_key.as_str();

    let (graph, source) = editor::load_or_template(&storage, key, || template_graph(catalog));
    if let LoadSource::Recovered(err) = &source {
        eprintln!("warning: stored diagram was unusable ({err}); starting from the template");
    }

    let hooks = EditorHooks {
        node_text: Some(Rc::new(|id: &str, text: &str| debug!(id, text, "node text edited"))),
        edge_label: Some(Rc::new(|id: &str, text: &str| debug!(id, text, "edge label edited"))),
    };
    let mut session = Editor::new(graph, &config.editor, hooks);
    let now = Instant::now();

    match cmd {
        EditorCommand::Show => {
            let encoded = editor::encode_document(session.graph(), editor::now_millis())?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{encoded}")?;
            return Ok(());
        }
        EditorCommand::Reset => {
            session.replace_graph(template_graph(catalog));
            println!(
                "reset {} to the template",
                storage.dir().join(format!("{key}.json")).display()
            );
        }
        EditorCommand::AddNode { label, node_type, x, y } => {
            let id = session.add_node(node_type, &label, Position::new(x, y), now)?;
            println!("{id}");
        }
        EditorCommand::Connect { source, target, label } => {
            let id = session.connect(&source, &target, label.as_deref(), now)?;
            println!("{id}");
        }
        EditorCommand::Label { id, text, edge } => {
            if edge {
                session.set_edge_label(&id, Some(&text), now)?;
            } else {
                session.set_node_label(&id, &text, now)?;
            }
        }
        EditorCommand::Delete { id } => {
            if session.graph().edge(&id).is_some() {
                session.delete_edge(&id, now)?;
            } else {
                session.delete_node(&id, now)?;
            }
        }
        EditorCommand::Move { id, x, y } => session.move_node(&id, Position::new(x, y), now)?,
    }

    editor::save(&mut storage, key, session.graph(), editor::now_millis())?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    let catalog = Catalog::builtin();

    match cli.command {
        Command::Phase { id, json } => print_phase(catalog, &id, json)?,
        Command::Score {
            impact,
            reach,
            investment,
        } => {
            let assessment = assess_raw(impact, reach, investment)?;
            println!("total {}: {}", assessment.total, assessment.band);
            println!("{}", assessment.band.recommendation());
        }
        Command::Search { query, html } => search(catalog, &query, html.as_deref())?,
        Command::Check => check(catalog)?,
        Command::Render { style, output } => {
            if let Some(style) = style {
                config.layout.connector_style = style.into();
            }
            match output {
                Some(path) => export::write_svg(&path, catalog, &config.layout, &config.overlay)?,
                None => println!(
                    "{}",
                    pmo_engine::diagram::render_lifecycle_svg(
                        catalog,
                        &config.layout,
                        &config.overlay
                    )
                ),
            }
        }
        Command::Site { out } => {
            let written = export::write_site(&out, catalog, &config.layout, &config.overlay)?;
            println!("wrote {written} files to {}", out.display());
        }
        Command::Export(cmd) => export_cmd(catalog, &config, cmd)?,
        Command::Editor(cmd) => editor_cmd(catalog, &config, cmd)?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
