use std::fs::File;
use std::io::{self, BufWriter, Read, Write, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use csvline::{HeaderComparer, HeaderMode, MissingColumnPolicy, Options, Separator};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MissingArg {
    Error,
    Empty,
    Null,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CaseArg {
    Exact,
    Ignore,
    IgnoreAscii,
}

#[derive(Parser, Debug)]
#[command(name = "csvline", about = "Print delimited text records as JSON", version)]
struct Args {
    /// Field separator: `auto`, `tab`, or a single character
    #[arg(short, long, default_value = "auto", value_parser = parse_separator)]
    separator: Separator,

    /// Input has no header line; columns are named Column1..ColumnN
    #[arg(long)]
    no_header: bool,

    /// Ignore this many leading lines
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Ignore lines starting with this prefix
    #[arg(long)]
    comment: Option<String>,

    /// Trim whitespace around raw values
    #[arg(long)]
    trim: bool,

    /// Treat `\"` inside quoted values as a literal quote
    #[arg(long)]
    backslash_escape: bool,

    /// Allow single quotes to enclose values
    #[arg(long)]
    single_quote: bool,

    /// Allow quoted values to span lines
    #[arg(long)]
    multiline: bool,

    /// Reject records whose column count differs from the header's
    #[arg(long)]
    validate: bool,

    /// Trim whitespace from values in the output
    #[arg(long)]
    trim_on_access: bool,

    /// Text joining the lines of a multiline value
    #[arg(long, default_value = "\n")]
    line_terminator: String,

    /// Result of a lookup by an unknown header name
    #[arg(long, value_enum, default_value_t = MissingArg::Error)]
    missing: MissingArg,

    /// Header name comparison
    #[arg(long, value_enum, default_value_t = CaseArg::Exact)]
    case: CaseArg,

    /// Alias group as a `;`-separated list of names (repeatable)
    #[arg(long = "alias", value_name = "NAMES")]
    aliases: Vec<String>,

    /// Emit a single JSON array instead of one object per line
    #[arg(long)]
    array: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Log parser events to stderr (`-vv` for trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

fn parse_separator(s: &str) -> Result<Separator, String> {
    match s {
        "auto" => Ok(Separator::Auto),
        "tab" | "\\t" => Ok(Separator::Char('\t')),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Separator::Char(c)),
                _ => Err(format!("expected `auto`, `tab` or a single character, got {s:?}")),
            }
        }
    }
}

impl Args {
    fn options(&self) -> Options {
        let mut options = Options {
            separator: self.separator,
            header_mode: if self.no_header {
                HeaderMode::Absent
            } else {
                HeaderMode::Present
            },
            rows_to_skip: self.skip,
            trim_data: self.trim,
            allow_backslash_escape: self.backslash_escape,
            allow_single_quote_enclosure: self.single_quote,
            allow_newline_in_quoted_field: self.multiline,
            validate_column_count: self.validate,
            trim_result_on_access: self.trim_on_access,
            line_terminator: self.line_terminator.clone(),
            missing_column_policy: match self.missing {
                MissingArg::Error => MissingColumnPolicy::Error,
                MissingArg::Empty => MissingColumnPolicy::Empty,
                MissingArg::Null => MissingColumnPolicy::Absent,
            },
            header_comparer: match self.case {
                CaseArg::Exact => HeaderComparer::Ordinal,
                CaseArg::Ignore => HeaderComparer::IgnoreCase,
                CaseArg::IgnoreAscii => HeaderComparer::IgnoreAsciiCase,
            },
            ..Options::default()
        };
        for group in &self.aliases {
            options = options.with_alias_group(group.split(';').map(str::trim).filter(|s| !s.is_empty()));
        }
        if let Some(prefix) = self.comment.clone() {
            options = options.with_skip_row(move |line, _| line.starts_with(&prefix));
        }
        options
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "csvline=debug",
        _ => "csvline=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn write_value(out: &mut impl Write, value: &serde_json::Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    Ok(())
}

fn run(args: &Args, input: Box<dyn Read>) -> Result<usize> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut rows = Vec::new();
    let mut count = 0;

    for record in csvline::read_from_reader(input, args.options()) {
        let record = record?;
        let value = record
            .to_json()
            .with_context(|| format!("record at line {}", record.index()))?;
        count += 1;
        if args.array {
            rows.push(value);
        } else {
            write_value(&mut out, &value, args.pretty)?;
            out.write_all(b"\n")?;
        }
    }

    if args.array {
        write_value(&mut out, &serde_json::Value::Array(rows), args.pretty)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(count)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let input: Box<dyn Read> = match &args.input {
        Some(path) => {
            if path.is_dir() {
                bail!("{} is a directory", path.display());
            }
            Box::new(File::open(path).with_context(|| format!("opening {}", path.display()))?)
        }
        None => Box::new(stdin()),
    };

    let count = run(&args, input)?;
    tracing::debug!(records = count, "done");
    Ok(())
}
