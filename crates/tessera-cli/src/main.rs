//! tessera CLI - inspect scenes, pick parts and price material assignments
//!
//! Stands in for the UI and the loader: scenes and catalogs are read from
//! disk, edits come from a script.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tessera_engine::{format_price, EngineConfig, MemoryCatalog, PriceResult, ProjectRecord, Session};
use tessera_ir::SceneFile;
use tessera_math::{Point3, Vec3};
use tessera_pick::Ray;
use tessera_scene::{MemoryScene, SceneAdapter};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod script;

use script::Step;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Material assignment and pricing for building models", long_about = None)]
struct Cli {
    /// Engine configuration (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pickable parts of a scene with their areas
    Info {
        /// Scene file (.json)
        scene: PathBuf,
    },
    /// Report the nearest part hit by a ray
    Pick {
        /// Scene file (.json)
        scene: PathBuf,
        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        origin: [f64; 3],
        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        direction: [f64; 3],
    },
    /// Price a saved project against a scene and catalog
    Price {
        /// Scene file (.json)
        scene: PathBuf,
        /// Material catalog (.json or .toml)
        catalog: PathBuf,
        /// Project record (.json)
        project: PathBuf,
    },
    /// Replay an edit script and print the priced result
    Run {
        /// Scene file (.json)
        scene: PathBuf,
        /// Material catalog (.json or .toml)
        catalog: PathBuf,
        /// Edit script
        script: PathBuf,
        /// Write the final state as a project record
        #[arg(long)]
        save: Option<PathBuf>,
        /// Project name for --save (default: script file stem)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Info { scene } => show_info(&scene, config)?,
        Commands::Pick {
            scene,
            origin,
            direction,
        } => pick(&scene, origin, direction, config)?,
        Commands::Price {
            scene,
            catalog,
            project,
        } => price_project(&scene, &catalog, &project, config)?,
        Commands::Run {
            scene,
            catalog,
            script,
            save,
            name,
        } => run_script(&scene, &catalog, &script, save.as_deref(), name, config)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_vec3(s: &str) -> std::result::Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {s:?}"));
    }
    let mut out = [0.0; 3];
    for (slot, text) in out.iter_mut().zip(&parts) {
        *slot = text
            .parse::<f64>()
            .map_err(|e| format!("{text:?}: {e}"))?;
    }
    Ok(out)
}

fn load_scene(path: &Path) -> Result<MemoryScene> {
    let json = fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))?;
    let file = SceneFile::from_json(&json)?;
    let scene = MemoryScene::from_scene_file(&file);
    info!(
        path = %path.display(),
        parts = scene.list_parts().len(),
        "scene read"
    );
    Ok(scene)
}

fn load_catalog(path: &Path) -> Result<MemoryCatalog> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let catalog = match ext.to_lowercase().as_str() {
        "toml" => MemoryCatalog::from_toml(&text)?,
        _ => MemoryCatalog::from_json(&text)?,
    };
    Ok(catalog)
}

fn open_session(scene: &Path, catalog: MemoryCatalog, config: EngineConfig) -> Result<Session> {
    let mut session = Session::new(config, catalog);
    session.load(load_scene(scene)?);
    Ok(session)
}

fn show_info(scene: &Path, config: EngineConfig) -> Result<()> {
    let mut session = open_session(scene, MemoryCatalog::default(), config)?;
    session.warm_areas()?;

    println!("scene: {}", session.model_ref()?);
    let parts: Vec<_> = session
        .parts()?
        .iter()
        .map(|p| (p.id.clone(), p.display_name().to_string(), p.triangle_count()))
        .collect();
    println!("  Parts: {}", parts.len());

    let mut total_area = 0.0;
    for (id, name, triangles) in &parts {
        let area = session.area(id)?;
        total_area += area;
        println!(
            "  {:<24} {name:<24} {triangles:>6} tris {area:>12.3} m²",
            id.as_str()
        );
    }
    println!("  Total area: {total_area:.3} m²");
    Ok(())
}

fn pick(scene: &Path, origin: [f64; 3], direction: [f64; 3], config: EngineConfig) -> Result<()> {
    let session = open_session(scene, MemoryCatalog::default(), config)?;
    let ray = Ray::new(
        Point3::new(origin[0], origin[1], origin[2]),
        Vec3::new(direction[0], direction[1], direction[2]),
    )?;
    match session.pick(&ray)? {
        Some(hit) => {
            let name = session.part(&hit.part_id)?.display_name().to_string();
            println!(
                "{} ({name}) at distance {:.4}, point ({:.4}, {:.4}, {:.4})",
                hit.part_id, hit.hit_distance, hit.point.x, hit.point.y, hit.point.z
            );
        }
        None => println!("no part hit"),
    }
    Ok(())
}

fn price_project(scene: &Path, catalog: &Path, project: &Path, config: EngineConfig) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let mut session = open_session(scene, catalog, config)?;

    let json = fs::read_to_string(project)
        .with_context(|| format!("reading project {}", project.display()))?;
    let record = ProjectRecord::from_json(&json)?;
    let restored = session.restore(&record)?;
    for dropped in &restored.dropped {
        println!(
            "warning: dropped {} -> {} (material not in catalog)",
            dropped.part_id, dropped.material_id
        );
    }

    println!("project: {}", record.project_name);
    println!("  Saved total: {}", format_price(record.total_price, &session.config().currency));
    let currency = session.config().currency.clone();
    print_price(session.price()?, &currency);
    Ok(())
}

fn run_script(
    scene: &Path,
    catalog: &Path,
    script_path: &Path,
    save: Option<&Path>,
    name: Option<String>,
    config: EngineConfig,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let mut session = open_session(scene, catalog, config)?;

    let text = fs::read_to_string(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    for line in script::parse(&text)? {
        let context = || format!("script line {}", line.line);
        match &line.step {
            Step::Apply { part, material } => {
                session.apply(part, material).with_context(context)?;
            }
            Step::Remove { part } => {
                if session.remove(part)?.is_none() {
                    println!("line {}: {part} had no material", line.line);
                }
            }
            Step::Undo => {
                if !session.undo()? {
                    println!("line {}: nothing to undo", line.line);
                }
            }
            Step::Redo => {
                if !session.redo()? {
                    println!("line {}: nothing to redo", line.line);
                }
            }
        }
    }

    let currency = session.config().currency.clone();
    print_price(session.price()?, &currency);

    if let Some(out) = save {
        let project_name = name.unwrap_or_else(|| {
            script_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled")
                .to_string()
        });
        let record = session.save(&project_name)?;
        fs::write(out, record.to_json()?)
            .with_context(|| format!("writing project {}", out.display()))?;
        println!("Saved {} to {}", record.project_name, out.display());
    }
    Ok(())
}

fn print_price(result: &PriceResult, currency: &str) {
    if result.lines.is_empty() && result.skipped.is_empty() {
        println!("  (no materials applied)");
    }
    for line in &result.lines {
        println!(
            "  {:<24} {:<20} {:>10.3} m² × {:>12} = {:>14}",
            line.part_id.as_str(),
            line.material_name,
            line.area,
            format_price(line.unit_price, currency),
            format_price(line.subtotal, currency),
        );
    }
    for skipped in &result.skipped {
        println!("  {:<24} skipped: {}", skipped.part_id.as_str(), skipped.reason);
    }
    println!("  Total: {}", format_price(result.total, currency));
}
