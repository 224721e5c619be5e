use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rangemark::html::HtmlOptions;

/// Convert Markdown with inline markup into properly nested HTML.
#[derive(Debug, Parser)]
#[command(name = "rangemark", version, about)]
struct Cli {
    /// Markdown file to convert. HTML goes to stdout unless --out is given.
    #[arg(required_unless_present = "all")]
    input: Option<PathBuf>,

    /// Write the HTML here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write a JSON envelope of the parsed document.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Emit only the rendered blocks, without the <html> document shell.
    #[arg(long)]
    bare: bool,

    /// Skip id attributes on headings.
    #[arg(long)]
    no_heading_ids: bool,

    /// Bulk mode: convert every .md under SRC_DIR into OUT_DIR.
    #[arg(long, num_args = 2, value_names = ["SRC_DIR", "OUT_DIR"], conflicts_with_all = ["input", "out", "json"])]
    all: Option<Vec<PathBuf>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let opts = HtmlOptions {
        document_shell: !cli.bare,
        heading_ids: !cli.no_heading_ids,
    };

    if let Some(dirs) = &cli.all {
        rangemark::convert_dir(&dirs[0], &dirs[1], &opts)?;
        return Ok(());
    }

    // clap guarantees input is present when --all is absent.
    let input = cli.input.as_deref().ok_or("no input file")?;
    let doc = rangemark::parse_file(input)?;
    let html = rangemark::html::render_blocks(&doc.blocks, &doc.meta, &opts);

    if let Some(json_path) = &cli.json {
        rangemark::write_json_envelope(&doc, Some(input), json_path)?;
    }

    match &cli.out {
        Some(out_path) => std::fs::write(out_path, &html)?,
        None => print!("{html}"),
    }
    Ok(())
}
