//! Command-line front end for xsd-lexical
//!
//! Encodes a value to the lexical form of an XML Schema type, decodes a
//! lexical string to its native value, or lists the known types.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use xsd_lexical::{registry, ConvertConfig, Converter, HexCase, ItemType, Value};

#[derive(Parser, Debug)]
#[command(name = "xsd-convert")]
#[command(version)]
#[command(about = "Convert between native values and XML Schema lexical forms", long_about = None)]
struct Cli {
    /// JSON file with conversion settings
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Validate lexical strings before decoding
    #[arg(long = "strict", global = true)]
    strict: bool,

    /// Write xs:hexBinary in lowercase
    #[arg(long = "lower-hex", global = true)]
    lower_hex: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG is used otherwise
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the lexical form of VALUE as TYPE
    Encode {
        /// Target type, e.g. xs:gDay
        #[arg(value_name = "TYPE")]
        ty: String,

        /// Value to encode; absent values take no argument
        value: Option<String>,

        /// How to read VALUE before encoding
        #[arg(long = "as", value_enum, default_value_t = InputKind::String)]
        kind: InputKind,
    },
    /// Print the native value of LEXICAL read as TYPE
    Decode {
        #[arg(value_name = "TYPE")]
        ty: String,

        lexical: String,
    },
    /// List the built-in atomic types
    Types {
        /// Emit JSON instead of one name per line
        #[arg(long = "json")]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InputKind {
    String,
    Integer,
    Double,
    Float,
    Boolean,
    /// UTF-8 bytes of the argument
    Bytes,
    Absent,
}

fn init_logging(verbose: u8) -> Result<LoggerHandle> {
    let logger = match verbose {
        0 => Logger::try_with_env_or_str("warn")?,
        1 => Logger::try_with_str("debug")?,
        _ => Logger::try_with_str("trace")?,
    };
    Ok(logger.start()?)
}

fn load_config(cli: &Cli) -> Result<ConvertConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => ConvertConfig::default(),
    };
    if cli.strict {
        config.strict_decode = true;
    }
    if cli.lower_hex {
        config.hex_case = HexCase::Lower;
    }
    debug!("using {:?}", config);
    Ok(config)
}

fn read_value(kind: InputKind, raw: Option<String>) -> Result<Value> {
    let raw = match (kind, raw) {
        (InputKind::Absent, None) => return Ok(Value::Absent),
        (InputKind::Absent, Some(_)) => bail!("--as absent takes no value"),
        (_, None) => bail!("a value is required unless --as absent is given"),
        (_, Some(raw)) => raw,
    };
    Ok(match kind {
        InputKind::String => Value::String(raw),
        InputKind::Integer => match raw.parse::<i64>() {
            Ok(n) => Value::Integer(n),
            // integer encoders read arbitrary precision from strings
            Err(_) => Value::String(raw),
        },
        InputKind::Double => Value::Double(parse_float(&raw)?),
        InputKind::Float => Value::Float(parse_float(&raw)? as f32),
        InputKind::Boolean => Value::Boolean(
            raw.parse::<bool>()
                .with_context(|| format!("{:?} is not true or false", raw))?,
        ),
        InputKind::Bytes => Value::Bytes(raw.into_bytes()),
        InputKind::Absent => Value::Absent,
    })
}

fn parse_float(raw: &str) -> Result<f64> {
    Ok(match raw {
        "INF" | "+INF" => f64::INFINITY,
        "-INF" => f64::NEG_INFINITY,
        "NaN" => f64::NAN,
        other => other
            .parse::<f64>()
            .with_context(|| format!("{:?} is not a number", other))?,
    })
}

fn list_types(json: bool) -> Result<()> {
    let reg = registry();
    if json {
        let entries: Vec<_> = reg
            .iter()
            .map(|(ty, c)| {
                serde_json::json!({
                    "type": ty,
                    "family": format!("{:?}", c.family()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (ty, _) in reg.iter() {
            println!("{}", ty);
        }
        for pseudo in [ItemType::Item, ItemType::Node, ItemType::Map, ItemType::Array] {
            println!("{}", pseudo);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose)?;
    let converter = Converter::with_config(load_config(&cli)?);

    match cli.command {
        Command::Encode { ty, value, kind } => {
            let value = read_value(kind, value)?;
            println!("{}", converter.encode_as(value, &ty)?);
        }
        Command::Decode { ty, lexical } => {
            let native = converter.decode_as(&lexical, &ty)?;
            println!("{}", native);
        }
        Command::Types { json } => list_types(json)?,
    }
    Ok(())
}
