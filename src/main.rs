use std::fs;
use std::process::ExitCode;

use automation_path_lookup::{
    JsonSettings, LookupError, LookupPolicy, PathLookup, PathLookupConfig, Provider, ProviderContext,
    TargetType, WrappedValue,
};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{info, Level};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Condition,
    Date,
    Integer,
    Number,
    Text,
    Object,
    Value,
}

/// Resolve a typed path lookup against a JSON document.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON document, or `@file` to read it from a file.
    json: String,
    /// Path: `/pointer/2`, `$.dotted[2]` or relative `0/alias`. Ignored with --config.
    #[arg(default_value = "")]
    path: String,
    /// Type to coerce the result to.
    #[arg(long = "type", value_enum, default_value = "value")]
    target: Target,
    /// Tenant reported in error diagnostics.
    #[arg(long)]
    tenant: Option<String>,
    /// Schema reference key reported in error diagnostics.
    #[arg(long)]
    schema_key: Option<String>,
    /// Path lookup configuration file (JSON). Replaces PATH and the policy flags.
    #[arg(long)]
    config: Option<String>,
    /// JSON settings file.
    #[arg(long)]
    settings: Option<String>,
    /// Execution trail: a JSON array of action records, oldest first.
    #[arg(long)]
    trail: Option<String>,
    #[arg(long)]
    no_raise_if_not_found: bool,
    #[arg(long)]
    value_if_not_found: Option<String>,
    #[arg(long)]
    no_raise_if_null: bool,
    #[arg(long)]
    value_if_null: Option<String>,
    #[arg(long)]
    no_raise_if_type_mismatch: bool,
    #[arg(long)]
    value_if_type_mismatch: Option<String>,
    /// More output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let (doc, succeeded) = match run(&args) {
        Ok(out) => (out, true),
        Err(e) => (e.to_json(), false),
    };
    match serde_json::to_string_pretty(&doc) {
        Ok(text) if succeeded => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Ok(text) => {
            eprintln!("{text}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Cannot render output: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Value, LookupError> {
    let data = read_json(&args.json, "document")?;
    let settings = match &args.settings {
        Some(file) => JsonSettings::from_json(&read_text(file)?)?,
        None => JsonSettings::default(),
    };
    let trail = match &args.trail {
        Some(text) => match read_json(text, "trail")? {
            Value::Array(records) => records,
            _ => return Err(LookupError::configuration("the trail must be a JSON array")),
        },
        None => Vec::new(),
    };

    let mut ctx = ProviderContext::new(data).with_trail(trail).with_settings(settings);
    if let Some(tenant) = &args.tenant {
        ctx = ctx.with_tenant(tenant.clone());
    }

    let config = match &args.config {
        Some(file) => PathLookupConfig::from_json(&read_text(file)?)?,
        None => PathLookupConfig {
            path: args.path.clone(),
            data_object: None,
            schema_reference_key: args.schema_key.clone(),
            policy: policy_from_flags(args)?,
        },
    };
    info!(path = %config.path, target = ?args.target, "resolving");

    match args.target {
        Target::Condition => evaluate::<bool>(&config, &ctx).map(Value::Bool),
        Target::Date => evaluate::<NaiveDate>(&config, &ctx)
            .map(|d| WrappedValue::Date(d).to_json()),
        Target::Integer => evaluate::<i64>(&config, &ctx).map(Value::from),
        Target::Number => evaluate::<Decimal>(&config, &ctx)
            .map(|d| WrappedValue::Decimal(d).to_json()),
        Target::Text => evaluate::<String>(&config, &ctx).map(Value::String),
        Target::Object => evaluate::<Value>(&config, &ctx),
        Target::Value => evaluate::<WrappedValue>(&config, &ctx).map(|v| v.to_json()),
    }
}

fn evaluate<T: TargetType>(config: &PathLookupConfig, ctx: &ProviderContext) -> Result<T, LookupError> {
    let lookup: PathLookup<T> = config.build()?;
    lookup.resolve(ctx)
}

fn policy_from_flags(args: &Args) -> Result<LookupPolicy, LookupError> {
    let fallback = |text: &Option<String>| -> Result<Option<Value>, LookupError> {
        text.as_deref().map(|t| read_json_or_string(t)).transpose()
    };
    Ok(LookupPolicy {
        raise_error_if_not_found: !args.no_raise_if_not_found && args.value_if_not_found.is_none(),
        value_if_not_found: fallback(&args.value_if_not_found)?,
        raise_error_if_null: !args.no_raise_if_null && args.value_if_null.is_none(),
        value_if_null: fallback(&args.value_if_null)?,
        raise_error_if_type_mismatch: !args.no_raise_if_type_mismatch
            && args.value_if_type_mismatch.is_none(),
        value_if_type_mismatch: fallback(&args.value_if_type_mismatch)?,
    })
}

fn read_text(file: &str) -> Result<String, LookupError> {
    fs::read_to_string(file)
        .map_err(|e| LookupError::configuration(format!("cannot read {file}: {e}")))
}

/// Parse a JSON argument; `@file` reads it from disk.
fn read_json(arg: &str, what: &str) -> Result<Value, LookupError> {
    let text = match arg.strip_prefix('@') {
        Some(file) => read_text(file)?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| LookupError::configuration(format!("invalid JSON {what}: {e}")))
}

/// Fallback values that are not valid JSON are taken as plain strings.
fn read_json_or_string(arg: &str) -> Result<Value, LookupError> {
    match read_json(arg, "fallback") {
        Ok(v) => Ok(v),
        Err(_) if !arg.starts_with('@') => Ok(Value::String(arg.to_string())),
        Err(e) => Err(e),
    }
}
