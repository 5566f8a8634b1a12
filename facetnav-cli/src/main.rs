use clap::{Parser, ValueEnum};
use facetnav::{
    Document, FacetNavError, FacetNavigation, FacetedNavigationEngine, MemoryEngine,
    NavigatorConfig, TantivyEngine, VirtualTree,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "facetnav", about = "Browse faceted navigation trees")]
struct Cli {
    /// Navigator configuration (namespaces and facet-navigation nodes).
    #[arg(long, env = "FACETNAV_CONFIG")]
    config: PathBuf,

    /// JSON array of documents to navigate.
    #[arg(long, env = "FACETNAV_DOCUMENTS")]
    documents: PathBuf,

    #[arg(long, value_enum, default_value_t = EngineKind::Memory)]
    engine: EngineKind,

    /// Levels below the node to print.
    #[arg(long, default_value_t = 1)]
    depth: usize,

    /// Absolute path of a facet-navigation node or a virtual node below it.
    path: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineKind {
    Memory,
    Tantivy,
}

fn build_engine(
    kind: EngineKind,
    documents: Vec<Document>,
) -> facetnav::Result<Arc<dyn FacetedNavigationEngine>> {
    let engine: Arc<dyn FacetedNavigationEngine> = match kind {
        EngineKind::Memory => Arc::new(MemoryEngine::new(documents)),
        EngineKind::Tantivy => Arc::new(TantivyEngine::from_documents(&documents)?),
    };
    Ok(engine)
}

/// Split `path` into the navigation it falls under and the virtual remainder.
fn split_path<'a>(config: &'a NavigatorConfig, path: &'a str) -> Option<(usize, &'a str)> {
    let path = path.trim_end_matches('/');
    config
        .navigations
        .iter()
        .enumerate()
        .filter_map(|(i, nav)| {
            let base = nav.path.trim_end_matches('/');
            let rest = path.strip_prefix(base)?;
            if rest.is_empty() || rest.starts_with('/') {
                Some((i, base.len(), rest))
            } else {
                None
            }
        })
        .max_by_key(|(_, len, _)| *len)
        .map(|(i, _, rest)| (i, rest))
}

fn run(cli: Cli) -> facetnav::Result<String> {
    let config = NavigatorConfig::load(&cli.config)?;
    let raw = std::fs::read_to_string(&cli.documents)?;
    let documents = Document::list_from_json(&serde_json::from_str(&raw)?)?;
    tracing::info!(
        "[CLI] {} navigations, {} documents",
        config.navigations.len(),
        documents.len()
    );

    let (index, rest) = split_path(&config, &cli.path).ok_or_else(|| {
        FacetNavError::NodeNotFound(format!("{} is not below a configured navigation", cli.path))
    })?;

    let navigation = FacetNavigation::new(
        build_engine(cli.engine, documents)?,
        Arc::new(config.into_repository()?),
        Arc::new(config.namespace_registry()?),
    );
    let mut tree = VirtualTree::new(Arc::new(navigation));
    let root = tree.mount(config.navigations[index].root_context());
    let node = tree
        .resolve(root, rest)?
        .ok_or_else(|| FacetNavError::NodeNotFound(cli.path.clone()))?;

    let snapshot = tree.snapshot(node, cli.depth)?;
    tracing::debug!("[CLI] materialized {} nodes", tree.len());
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
