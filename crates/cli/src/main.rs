use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use num_rational::BigRational;
use serde::Deserialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use grofan::fan::{read_cone, write_cone, ConeId, Fan, FanCfg, SearchEngine};
use grofan::poly::{Ideal, Monomial, Poly, TermOrder};
use grofan::vector::{ivec, IntVec};

#[derive(Parser)]
#[command(name = "grofan")]
#[command(about = "Gröbner fan enumeration")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Enumerate the fan of an ideal and persist one record per cone
    Fan {
        /// Ideal description (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Output directory for cone records
        #[arg(long)]
        out: PathBuf,
        /// Starting weight, comma-separated positive integers
        #[arg(long)]
        start: Option<String>,
        #[arg(long, default_value_t = 10_000)]
        max_cones: usize,
        /// Use the queue-based traversal instead of reverse search
        #[arg(long)]
        bfs: bool,
        /// Also record codim-2 adjacency per facet
        #[arg(long)]
        codim2: bool,
    },
    /// Run both traversals and verify they enumerate the same fan
    Check {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        start: Option<String>,
    },
    /// Print a persisted cone record
    Show {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        ucn: u64,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Fan {
            input,
            out,
            start,
            max_cones,
            bfs,
            codim2,
        } => fan(&input, &out, start, max_cones, bfs, codim2),
        Action::Check { input, start } => check(&input, start),
        Action::Show { dir, ucn } => show(&dir, ucn),
    }
}

#[derive(Deserialize)]
struct TermIn {
    coeff: String,
    exps: Vec<u32>,
}

#[derive(Deserialize)]
struct GenIn {
    terms: Vec<TermIn>,
}

#[derive(Deserialize)]
struct IdealIn {
    nvars: usize,
    generators: Vec<GenIn>,
}

fn load_ideal(path: &Path) -> Result<Arc<Ideal>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading ideal from {}", path.display()))?;
    let input: IdealIn = serde_json::from_str(&body).context("parsing ideal JSON")?;
    if input.nvars == 0 {
        bail!("ideal must have at least one variable");
    }
    // Generators only need a consistent initial sort; all-ones works.
    let order = TermOrder::weight(ivec(&vec![1; input.nvars]));
    let mut gens = Vec::with_capacity(input.generators.len());
    for (k, g) in input.generators.iter().enumerate() {
        let mut terms = Vec::with_capacity(g.terms.len());
        for t in &g.terms {
            if t.exps.len() != input.nvars {
                bail!(
                    "generator {k}: exponent vector has {} entries, expected {}",
                    t.exps.len(),
                    input.nvars
                );
            }
            let coeff = BigRational::from_str(&t.coeff)
                .with_context(|| format!("generator {k}: bad coefficient {:?}", t.coeff))?;
            terms.push((Monomial(t.exps.clone()), coeff));
        }
        gens.push(Poly::from_terms(terms, &order));
    }
    Ok(Ideal::new(input.nvars, gens))
}

fn parse_start(s: Option<String>) -> Result<Option<IntVec>> {
    let Some(s) = s else { return Ok(None) };
    let entries: Result<Vec<i64>, _> = s.split(',').map(|x| x.trim().parse::<i64>()).collect();
    let entries = entries.with_context(|| format!("bad start weight {s:?}"))?;
    Ok(Some(ivec(&entries)))
}

fn enumerate(input: &Path, start: Option<String>, cfg: FanCfg, bfs: bool) -> Result<Fan> {
    let ideal = load_ideal(input)?;
    let cfg = FanCfg {
        start_weight: parse_start(start)?,
        ..cfg
    };
    let mut eng = SearchEngine::new(cfg);
    let fan = if bfs {
        eng.breadth_first(ideal, true)?
    } else {
        eng.reverse_search(ideal)?
    };
    Ok(fan)
}

fn fan(
    input: &Path,
    out: &Path,
    start: Option<String>,
    max_cones: usize,
    bfs: bool,
    codim2: bool,
) -> Result<()> {
    let cfg = FanCfg {
        max_cones,
        with_codim2: codim2,
        ..FanCfg::default()
    };
    let fan = enumerate(input, start, cfg, bfs)?;
    std::fs::create_dir_all(out)?;
    let mut files = Vec::with_capacity(fan.len());
    for cone in fan.cones() {
        let path = write_cone(out, cone)?;
        files.push(path.display().to_string());
    }
    tracing::info!(cones = fan.len(), out = %out.display(), "fan written");
    let summary = serde_json::json!({
        "cones": fan.len(),
        "root": fan.root_id().0,
        "files": files,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn check(input: &Path, start: Option<String>) -> Result<()> {
    let rev = enumerate(input, start.clone(), FanCfg::default(), false)?;
    let bfs = enumerate(input, start, FanCfg::default(), true)?;
    let mut a = rev.interior_points();
    let mut b = bfs.interior_points();
    a.sort();
    b.sort();
    let agree = a == b;
    let summary = serde_json::json!({
        "reverse_search_cones": rev.len(),
        "breadth_first_cones": bfs.len(),
        "agree": agree,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if !agree {
        bail!("traversals disagree on the fan");
    }
    Ok(())
}

fn show(dir: &Path, ucn: u64) -> Result<()> {
    let cone = read_cone(dir, ConeId(ucn))?;
    println!("cone {}", cone.id);
    match cone.parent {
        Some(p) => println!("parent {p}"),
        None => println!("parent (root)"),
    }
    let point: Vec<String> = cone.interior_point.iter().map(|x| x.to_string()).collect();
    println!("interior point ({})", point.join(", "));
    println!("basis:");
    for g in &cone.basis {
        println!("  {g}");
    }
    println!("facets:");
    for f in cone.facets() {
        println!("  {f}");
    }
    Ok(())
}
