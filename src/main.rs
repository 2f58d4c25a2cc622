use anyhow::{Context, bail};
use clap::Parser;
use itertools::Itertools;
use std::io::{self, Read};

use braid::{
    Anchor, Builder, CaptureGroup, ConsoleReporter, FlagSet, Level, Reporter, alias, raw,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Define an alias as NAME=PATTERN (repeatable)
    #[arg(short = 'a', long = "alias", value_name = "NAME=PATTERN")]
    aliases: Vec<String>,

    /// Define a capture group as NAME=PATTERN and extract from stdin (repeatable)
    #[arg(short = 'g', long = "group", value_name = "NAME=PATTERN")]
    groups: Vec<String>,

    /// Anchor capture matches: none, start, end or full
    #[arg(long, default_value = "none")]
    anchor: String,

    /// Match flags, e.g. "im"
    #[arg(short = 'f', long, default_value = "")]
    flags: String,

    /// Alias references to compose into a pattern
    #[arg(value_name = "EXPR")]
    expr: Vec<String>,
}

fn main() {
    if let Err(err) = run() {
        ConsoleReporter.report(Level::Error, &format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let flags: FlagSet = args
        .flags
        .parse()
        .with_context(|| format!("invalid flags {:?}", args.flags))?;
    let anchor = parse_anchor(&args.anchor)?;

    let mut builder = Builder::new();
    for def in &args.aliases {
        let (name, pattern) = split_def(def)?;
        builder
            .define_alias(name, raw(pattern))
            .with_context(|| format!("defining alias {name:?}"))?;
    }

    if !args.groups.is_empty() {
        let groups: Vec<CaptureGroup> = args
            .groups
            .iter()
            .map(|def| split_def(def).map(|(name, pattern)| CaptureGroup::raw(name, pattern)))
            .collect::<anyhow::Result<_>>()?;

        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;

        let found = builder.capture(&text, &groups, anchor, flags)?;
        for fields in found {
            let line = fields
                .iter()
                .map(|(name, value)| format!("{name}={}", value.unwrap_or("")))
                .join(" ");
            println!("{line}");
        }
        return Ok(());
    }

    if args.expr.is_empty() {
        bail!("nothing to do: pass alias references or capture groups");
    }

    let refs: Vec<_> = args.expr.iter().map(alias).collect();
    let compiled = builder.compile_with_flags(&refs, flags)?;
    println!("{}", compiled.source);
    println!("flags: {}", compiled.flags);
    Ok(())
}

fn parse_anchor(name: &str) -> anyhow::Result<Anchor> {
    match name {
        "none" => Ok(Anchor::None),
        "start" => Ok(Anchor::Start),
        "end" => Ok(Anchor::End),
        "full" => Ok(Anchor::Full),
        other => bail!("unknown anchor {other:?} (expected none, start, end or full)"),
    }
}

fn split_def(def: &str) -> anyhow::Result<(&str, &str)> {
    def.split_once('=')
        .with_context(|| format!("expected NAME=PATTERN, got {def:?}"))
}
