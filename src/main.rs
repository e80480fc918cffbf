use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};

use huffpress::{CodeTable, CompressionStats, FrequencyTable, HuffmanTree, SerializableCodeTable};

/// Inputs below this many bytes rarely shrink.
const SMALL_INPUT_BYTES: usize = 500;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Compress and decompress text files with Huffman coding.
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log every step (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a text file
    #[command(visible_alias = "c")]
    Compress(FileArgs),
    /// Restore a file written by `compress`
    #[command(visible_alias = "d")]
    Decompress(FileArgs),
    /// Print the code every character of a text file would get
    Codes(CodesArgs),
}

#[derive(Args)]
struct InputArgs {
    /// File to read
    file: PathBuf,

    /// Accept files without a .txt extension
    #[arg(long)]
    any_extension: bool,
}

#[derive(Args)]
struct CodesArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Also save the code table to this file as MessagePack
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

#[derive(Args)]
struct FileArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Where to write the result [default: <stem>_compressed.txt or
    /// <stem>_decompressed.txt next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::Compress(args) => compress(&args),
        Command::Decompress(args) => decompress(&args),
        Command::Codes(args) => codes(&args),
    }
}

fn compress(args: &FileArgs) -> anyhow::Result<()> {
    info!("reading {}", args.input.file.display());
    let text = read_text(&args.input)?;

    if text.is_empty() {
        info!("file is empty; a tiny compressed file will still be written");
    } else if text.len() < SMALL_INPUT_BYTES {
        info!("file is small; the compressed size may be close to the original");
    } else {
        info!("compressing with Huffman coding");
    }

    let compressed = huffpress::encode(&text)?;
    let out = args
        .output
        .clone()
        .unwrap_or_else(|| sibling(&args.input.file, "compressed"));
    fs::write(&out, &compressed.text)
        .with_context(|| format!("cannot write {}", out.display()))?;

    println!("{}", compressed.message);
    println!("{}", CompressionStats::new(&text, &compressed.text));
    println!("Written to {}", out.display());
    Ok(())
}

fn decompress(args: &FileArgs) -> anyhow::Result<()> {
    info!("reading {}", args.input.file.display());
    let text = read_text(&args.input)?;

    let decompressed = huffpress::decode(&text).with_context(|| {
        format!(
            "cannot decompress {}; was it written by `huffpress compress`?",
            args.input.file.display()
        )
    })?;
    let out = args
        .output
        .clone()
        .unwrap_or_else(|| sibling(&args.input.file, "decompressed"));
    fs::write(&out, &decompressed.text)
        .with_context(|| format!("cannot write {}", out.display()))?;

    println!("{}", decompressed.message);
    println!("Recovered text size: {} bytes", decompressed.text.len());
    println!("Written to {}", out.display());
    Ok(())
}

fn codes(args: &CodesArgs) -> anyhow::Result<()> {
    let text = read_text(&args.input)?;
    let freq = FrequencyTable::from_text(&text);

    let Some(tree) = HuffmanTree::from_frequencies(&freq) else {
        println!(
            "{} distinct characters; no prefix code is needed",
            freq.len()
        );
        return Ok(());
    };
    let table = CodeTable::from_tree(&tree);
    debug!("{} codes derived", table.len());

    let mut rows: Vec<_> = freq.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    for (symbol, count) in rows {
        let code: String = table
            .get(symbol)
            .into_iter()
            .flat_map(|bits| bits.iter().by_vals())
            .map(|b| if b { '1' } else { '0' })
            .collect();
        println!("{:>8?} {:>10} {}", symbol, count, code);
    }
    println!(
        "{} bits of payload for {} characters",
        table.encoded_len(freq.iter()),
        freq.total()
    );

    if let Some(path) = &args.save {
        let mut file = File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        SerializableCodeTable::from(&table)
            .write_to(&mut file)
            .with_context(|| format!("cannot write code table to {}", path.display()))?;
        println!("Code table saved to {}", path.display());
    }
    Ok(())
}

fn read_text(args: &InputArgs) -> anyhow::Result<String> {
    let path = &args.file;
    let is_txt = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if !is_txt && !args.any_extension {
        bail!(
            "only .txt files are supported, got {} (pass --any-extension to override)",
            path.display()
        );
    }

    fs::read_to_string(path).with_context(|| format!("cannot read {} as UTF-8 text", path.display()))
}

/// `dir/<stem>_<suffix>.txt` for an input at `dir/<stem>.<ext>`.
fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_{suffix}.txt"))
}
