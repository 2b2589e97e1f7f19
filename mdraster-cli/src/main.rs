//! mdraster command line.
//!
//! Reads Markdown from a file or stdin and writes a PNG.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mdraster_font::{FontCache, FontLibrary};
use mdraster_layout::MarginMode;
use mdraster_markdown::MarkdownParser;
use mdraster_render::{RenderOptions, render_document};
use mdraster_style::{Theme, ThemePreset, resolve_styles};
use owo_colors::OwoColorize;

/// Render Markdown to a PNG image, wrapping mixed CJK and Latin text.
#[derive(Parser, Debug)]
#[command(name = "mdraster")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r"EXAMPLES:
    # Render a file with the light theme
    mdraster notes.md -o notes.png

    # Narrow dark image from stdin
    echo '# 你好 world' | mdraster - -o hello.png --width 320 --theme dark

    # Custom theme on top of the CJK preset, fonts from a directory
    mdraster doc.md -o doc.png --theme cjk --theme-file overrides.json --font-dir ./fonts
")]
struct Cli {
    /// Markdown file to render, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Where to write the PNG
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Built-in theme (light, dark, cjk)
    #[arg(long, default_value = "light")]
    theme: ThemePreset,

    /// JSON theme overrides applied on top of --theme
    #[arg(long, value_name = "FILE")]
    theme_file: Option<PathBuf>,

    /// Extra directory to search for font files (repeatable)
    #[arg(long, value_name = "DIR")]
    font_dir: Vec<PathBuf>,

    /// Font family for all text
    #[arg(long, value_name = "FAMILY")]
    font: Option<String>,

    /// Font family to fall back to when a requested one is missing
    #[arg(long, value_name = "FAMILY")]
    default_font: Option<String>,

    /// How margins between blocks combine (collapse, additive)
    #[arg(long, default_value = "collapse")]
    margins: MarginMode,

    /// Measure with built-in approximate metrics instead of system fonts
    #[arg(long)]
    approximate_fonts: bool,

    /// Print the layout tree
    #[arg(long)]
    dump_layout: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = read_input(&cli.input)?;
    let theme = load_theme(&cli)?;
    let fonts = FontCache::new(font_library(&cli));

    let (doc, issues) = MarkdownParser::new(&source).run_with_issues();
    let styles = resolve_styles(&doc, &theme);
    let options = RenderOptions::from_theme(&theme, cli.width).with_margins(cli.margins);
    let rendered = render_document(&doc, &styles, &options, &fonts)
        .with_context(|| format!("failed to render '{}'", cli.input))?;

    if cli.dump_layout {
        println!("{}", "=== Layout Tree ===".bold());
        print!("{}", rendered.layout.dump());
        println!();
    }

    rendered.canvas.save_png(&cli.output)?;

    println!(
        "{} {} ({}x{}, {} blocks, {} lines)",
        "Rendered".green().bold(),
        cli.output.display(),
        rendered.canvas.width(),
        rendered.canvas.height(),
        rendered.layout.blocks.len(),
        rendered.layout.lines().count()
    );
    for substitution in fonts.substitutions() {
        println!(
            "  {} font '{}' not found, used '{}'",
            "!".yellow(),
            substitution.requested,
            substitution.used
        );
    }
    for issue in &issues {
        println!("  {} line {}: {}", "!".yellow(), issue.line, issue.message);
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        let _ = io::stdin()
            .read_to_string(&mut source)
            .context("failed to read Markdown from stdin")?;
        Ok(source)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read '{input}'"))
    }
}

fn load_theme(cli: &Cli) -> Result<Theme> {
    let mut theme = cli.theme.theme();
    if let Some(ref path) = cli.theme_file {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read theme file '{}'", path.display()))?;
        theme = Theme::from_json_over(&json, &theme)
            .with_context(|| format!("invalid theme file '{}'", path.display()))?;
    }
    if let Some(ref family) = cli.font {
        theme = theme.with_font(family.clone(), None);
    }
    log::debug!("using theme '{}'", cli.theme);
    Ok(theme)
}

fn font_library(cli: &Cli) -> FontLibrary {
    let mut library = if cli.approximate_fonts {
        FontLibrary::approximate()
    } else {
        FontLibrary::system()
    };
    for dir in &cli.font_dir {
        let _ = library.add_search_dir(dir.clone());
    }
    if let Some(ref family) = cli.default_font {
        let _ = library.set_default_family(family);
    }
    library
}
