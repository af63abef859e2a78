//! Dynvar CLI
//!
//! Command-line interface for inspecting and editing dynvar files.

use clap::{CommandFactory, Parser as ClapParser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use dynvar_core::{StoreConfig, Value, VarMap, VarStore, Variant, codec};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::debug;

#[derive(ClapParser)]
#[command(name = "dynvar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and edit dynvar files", long_about = None)]
struct Cli {
    /// Store file (overrides the path from --config)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Store configuration (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read and write the store with gzip framing
    #[arg(long, global = true)]
    gzip: bool,

    /// Log decode and I/O details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value stored under a key
    Get {
        key: String,

        /// Read the value as this type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<TypeArg>,
    },

    /// Store a value under a key and save the file
    Set {
        key: String,

        value: String,

        /// Pin the field to this type (inferred from the literal when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<TypeArg>,
    },

    /// Remove a key and save the file
    Remove { key: String },

    /// List keys in file order
    Keys,

    /// Print every entry
    Dump {
        /// Emit a JSON array of {key, type, value} objects
        #[arg(long)]
        json: bool,
    },

    /// Rewrite the store with the other framing (plain <-> gzip)
    Convert {
        /// Destination file
        output: PathBuf,

        /// Gzip level when the destination is compressed (1-9)
        #[arg(long)]
        level: Option<u32>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Time,
    Float,
    Double,
    String,
}

impl From<TypeArg> for Variant {
    fn from(kind: TypeArg) -> Self {
        match kind {
            TypeArg::Bool => Variant::Boolean,
            TypeArg::Byte => Variant::Byte,
            TypeArg::Short => Variant::Short,
            TypeArg::Int => Variant::Int,
            TypeArg::Long => Variant::Long,
            TypeArg::Time => Variant::Time,
            TypeArg::Float => Variant::Float,
            TypeArg::Double => Variant::Double,
            TypeArg::String => Variant::String,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        run_completions(shell);
        return;
    }

    let store = resolve_store(&cli);
    debug!(
        "using store {} (gzip: {})",
        store.path().display(),
        store.is_gzip()
    );

    match cli.command {
        Commands::Get { key, kind } => run_get(&store, &key, kind),
        Commands::Set { key, value, kind } => run_set(&store, &key, &value, kind),
        Commands::Remove { key } => run_remove(&store, &key),
        Commands::Keys => run_keys(&store),
        Commands::Dump { json } => run_dump(&store, json),
        Commands::Convert { output, level } => run_convert(&store, output, level),
        Commands::Completions { .. } => {}
    }
}

fn init_logging(verbose: bool) {
    let directive = if verbose {
        "dynvar_core=debug,dynvar=debug"
    } else {
        "dynvar_core=warn,dynvar=warn"
    };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for part in directive.split(',') {
        if let Ok(d) = part.parse() {
            filter = filter.add_directive(d);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_store(cli: &Cli) -> VarStore {
    let mut config = match &cli.config {
        Some(path) => match StoreConfig::load(path) {
            Ok(config) => config,
            Err(e) => fail(e),
        },
        None => StoreConfig::default(),
    };
    if let Some(file) = &cli.file {
        config.path = file.clone();
    }
    if cli.gzip {
        config.gzip = true;
    }
    VarStore::from_config(&config)
}

/// Load the store, treating a missing file as empty
fn open(store: &VarStore) -> VarMap {
    let mut vars = VarMap::new();
    match store.try_load(&mut vars) {
        Ok(report) if report.malformed > 0 => {
            eprintln!(
                "Warning: {} malformed line(s) skipped in {}",
                report.malformed,
                store.path().display()
            );
        }
        Ok(_) => {}
        Err(e) if e.is_not_found() => debug!("{}", e),
        Err(e) => fail(e),
    }
    vars
}

fn commit(store: &VarStore, vars: &VarMap) {
    if let Err(e) = store.try_save(vars) {
        fail(e);
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", error);
    process::exit(1);
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "dynvar", &mut io::stdout());
}

fn run_get(store: &VarStore, key: &str, kind: Option<TypeArg>) {
    let mut vars = open(store);
    let value = match kind {
        Some(kind) => {
            let variant = Variant::from(kind);
            vars.get_var(key, variant, variant.zero()).get()
        }
        None => match vars.get_value(key) {
            Some(value) => value,
            None => fail(format!("no such key '{}'", key)),
        },
    };
    println!("{}", value);
}

fn run_set(store: &VarStore, key: &str, literal: &str, kind: Option<TypeArg>) {
    let mut vars = open(store);
    match kind {
        Some(kind) => {
            let variant = Variant::from(kind);
            let Some(value) = variant.coerce(&Value::from(literal)) else {
                fail(format!("'{}' is not a valid {} value", literal, variant));
            };
            vars.get_var(key, variant, Value::Null).set(value);
        }
        None => {
            vars.put(key, codec::sniff(literal));
        }
    }
    commit(store, &vars);
}

fn run_remove(store: &VarStore, key: &str) {
    let mut vars = open(store);
    if vars.remove(key).is_none() {
        fail(format!("no such key '{}'", key));
    }
    commit(store, &vars);
}

fn run_keys(store: &VarStore) {
    let vars = open(store);
    for key in vars.keys() {
        println!("{}", key);
    }
}

fn run_dump(store: &VarStore, as_json: bool) {
    let vars = open(store);
    if !as_json {
        let text = VarStore::save_to_string(&vars);
        if !text.is_empty() {
            println!("{}", text);
        }
        return;
    }

    let entries: Vec<serde_json::Value> = vars
        .iter()
        .map(|(key, var)| {
            json!({
                "key": key,
                "type": var.variant().name(),
                "value": to_json(&var.get()),
            })
        })
        .collect();
    match serde_json::to_string_pretty(&entries) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(e),
    }
}

fn run_convert(store: &VarStore, output: PathBuf, level: Option<u32>) {
    let vars = open(store);
    let mut target = VarStore::new(output).with_gzip(!store.is_gzip());
    if let Some(level) = level {
        target = target.with_compression_level(level);
    }
    commit(&target, &vars);
    println!(
        "Converted {} -> {} ({})",
        store.path().display(),
        target.path().display(),
        if target.is_gzip() { "gzip" } else { "plain" }
    );
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_) => {
            json!(value.as_i64())
        }
        Value::Float(_) | Value::Double(_) => value
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| json!(value.to_string())),
        Value::String(s) => json!(s),
        Value::Object(_) => json!(value.to_string()),
    }
}
