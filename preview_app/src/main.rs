//! SDF text preview
//!
//! Loads a preview configuration, glyph tables and shaders, runs a preview
//! session against the headless back end and reports the resulting layout.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use serde::Serialize;

use sdf_preview::foundation::logging;
use sdf_preview::prelude::*;
use sdf_preview::render::text::TextBounds;

const DEFAULT_CONFIG: &str = "resources/preview.toml";

/// Layout written by `--dump`
#[derive(Debug, Serialize)]
struct LayoutDump<'a> {
    text: &'a str,
    glyph_count: usize,
    vertex_count: usize,
    bounds: Option<[f32; 4]>,
    positions: &'a [f32],
    uvs: &'a [f32],
}

fn cli() -> Command {
    Command::new("sdf_text_preview")
        .about("Lays out text with an SDF glyph atlas and drives a preview session")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Preview configuration (.toml or .ron)")
                .default_value(DEFAULT_CONFIG),
        )
        .arg(
            Arg::new("text")
                .short('t')
                .long("text")
                .value_name("TEXT")
                .help("Text to lay out after start-up"),
        )
        .arg(
            Arg::new("shader")
                .long("shader")
                .value_name("NAME")
                .help("Fragment shader to switch to"),
        )
        .arg(
            Arg::new("texture")
                .long("texture")
                .value_name("URL")
                .help("Atlas texture to switch to"),
        )
        .arg(
            Arg::new("min-filter")
                .long("min-filter")
                .value_name("FILTER")
                .help("Minification filter: Linear or Nearest"),
        )
        .arg(
            Arg::new("mag-filter")
                .long("mag-filter")
                .value_name("FILTER")
                .help("Magnification filter: Linear or Nearest"),
        )
        .arg(
            Arg::new("dump")
                .short('o')
                .long("dump")
                .value_name("FILE")
                .help("Write the final layout to FILE (.json or .ron)"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILTER")
                .help("Log filter, e.g. 'debug' or 'sdf_preview=trace'"),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    match matches.get_one::<String>("log") {
        Some(filter) => logging::init_with_filter(filter),
        None => logging::init(),
    }

    if let Ok(cwd) = std::env::current_dir() {
        log::debug!("Current working directory: {:?}", cwd);
    }

    run(&matches)
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config_path = PathBuf::from(required(matches, "config")?);
    let config = if config_path.exists() {
        PreviewConfig::load_from_file(&config_path)
            .with_context(|| format!("loading configuration {}", config_path.display()))?
    } else {
        log::warn!("Configuration {} not found, using defaults", config_path.display());
        PreviewConfig::default()
    };
    config.validate().context("validating configuration")?;

    let tables = GlyphTables::load(&config.atlas.metadata_path, &config.atlas.metrics_path)
        .context("loading glyph tables")?;
    let layout = TextLayout::new(tables, config.layout_params());
    let shaders = ShaderDirectory::new(&config.shaders.directory, &config.shaders.vertex);

    let shader_name = config
        .initial_fragment_shader()
        .context("no fragment shader configured")?
        .to_string();
    let texture_url = config
        .initial_texture()
        .context("no texture configured")?
        .to_string();

    let mut session = PreviewSession::new(
        config,
        layout,
        ImageTextureLoader::new(),
        shaders,
        HeadlessBackend::new(),
    );
    session
        .initialize(&shader_name, &texture_url)
        .context("initializing preview session")?;

    apply_overrides(&mut session, matches)?;
    session.render_frame().context("rendering frame")?;

    let Some(state) = session.state() else {
        bail!("preview session lost its state");
    };
    report(&state.text, &state.layout);

    if let Some(path) = matches.get_one::<String>("dump") {
        dump_layout(Path::new(path), &state.text, &state.layout)?;
        log::info!("Layout written to {}", path);
    }

    Ok(())
}

type HeadlessSession = PreviewSession<ImageTextureLoader, ShaderDirectory, HeadlessBackend>;

fn apply_overrides(session: &mut HeadlessSession, matches: &ArgMatches) -> Result<()> {
    if let Some(url) = matches.get_one::<String>("texture") {
        session
            .change_texture(url)
            .with_context(|| format!("switching texture to {url}"))?;
    }
    if let Some(name) = matches.get_one::<String>("shader") {
        session
            .change_shader(name)
            .with_context(|| format!("switching shader to {name}"))?;
    }
    if let Some(filter) = parse_filter(matches, "min-filter")? {
        session.change_min_filter(filter)?;
    }
    if let Some(filter) = parse_filter(matches, "mag-filter")? {
        session.change_mag_filter(filter)?;
    }
    if let Some(text) = matches.get_one::<String>("text") {
        let changes = session.change_text(text)?;
        log::debug!("change_text -> {:?}", changes);
    }
    Ok(())
}

fn parse_filter(matches: &ArgMatches, name: &str) -> Result<Option<TextureFilter>> {
    matches
        .get_one::<String>(name)
        .map(|value| value.parse::<TextureFilter>().with_context(|| format!("--{name}")))
        .transpose()
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

fn report(text: &str, layout: &LayoutResult) {
    log::info!(
        "Laid out {:?}: {} of {} chars rendered, {} vertices",
        text,
        layout.glyph_count(),
        text.chars().count(),
        layout.vertex_count()
    );
    match layout.bounds() {
        Some(bounds) => log::info!(
            "Bounds: x {:.2}..{:.2}, y {:.2}..{:.2} ({:.2} x {:.2})",
            bounds.min_x,
            bounds.max_x,
            bounds.min_y,
            bounds.max_y,
            bounds.width(),
            bounds.height()
        ),
        None => log::info!("Nothing to draw"),
    }
}

fn dump_layout(path: &Path, text: &str, layout: &LayoutResult) -> Result<()> {
    let dump = LayoutDump {
        text,
        glyph_count: layout.glyph_count(),
        vertex_count: layout.vertex_count(),
        bounds: layout.bounds().map(|b: TextBounds| [b.min_x, b.min_y, b.max_x, b.max_y]),
        positions: layout.positions(),
        uvs: layout.uvs(),
    };

    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::to_string_pretty(&dump)?,
        Some("ron") => ron::ser::to_string_pretty(&dump, ron::ser::PrettyConfig::default())?,
        _ => bail!("unsupported dump format for {} (use .json or .ron)", path.display()),
    };
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
