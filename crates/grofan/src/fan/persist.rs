//! Cone persistence: one JSON record per cone, `cone_<ucn>.json`.
//!
//! Numbers are stored as decimal strings (`BigInt` via `Display`,
//! `BigRational` as `num` or `num/denom`), so records survive arbitrary
//! precision and re-parse exactly. A record is self-contained: ring arity,
//! defining order rows, reduced basis, interior point, and facet geometry,
//! enough to resume a traversal from the stored cone.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};

use super::cone::{Cone, ConeSeed, RingCtx};
use super::facet::{ConeId, Facet};
use crate::error::FanError;
use crate::poly::{Ideal, Monomial, Poly, TermOrder};
use crate::vector::{is_mixed_sign, IntVec};

#[derive(Serialize, Deserialize)]
struct TermRecord {
    coeff: String,
    exps: Vec<u32>,
}

#[derive(Serialize, Deserialize)]
struct PolyRecord {
    terms: Vec<TermRecord>,
}

#[derive(Serialize, Deserialize)]
struct FacetRecord {
    normal: Vec<String>,
    interior_point: Vec<String>,
    ucn: Option<u64>,
    codim: usize,
    flippable: bool,
    incoming: bool,
    codim2: Vec<Vec<String>>,
}

/// On-disk cone record.
#[derive(Serialize, Deserialize)]
pub struct ConeRecord {
    pub ucn: u64,
    pub parent: Option<u64>,
    pub nvars: usize,
    order_rows: Vec<Vec<String>>,
    basis: Vec<PolyRecord>,
    interior_point: Vec<String>,
    facets: Vec<FacetRecord>,
}

fn int_strings(v: &[BigInt]) -> Vec<String> {
    v.iter().map(|x| x.to_string()).collect()
}

fn parse_int(s: &str) -> Result<BigInt, FanError> {
    BigInt::from_str(s).map_err(|e| FanError::PersistNumber(format!("{s:?}: {e}")))
}

fn parse_ints(v: &[String]) -> Result<IntVec, FanError> {
    v.iter().map(|s| parse_int(s)).collect()
}

fn parse_rat(s: &str) -> Result<BigRational, FanError> {
    BigRational::from_str(s).map_err(|e| FanError::PersistNumber(format!("{s:?}: {e}")))
}

fn poly_record(p: &Poly) -> PolyRecord {
    PolyRecord {
        terms: p
            .terms
            .iter()
            .map(|(m, c)| TermRecord {
                coeff: c.to_string(),
                exps: m.0.clone(),
            })
            .collect(),
    }
}

fn poly_from_record(rec: &PolyRecord, order: &TermOrder) -> Result<Poly, FanError> {
    let mut terms = Vec::with_capacity(rec.terms.len());
    for t in &rec.terms {
        terms.push((Monomial(t.exps.clone()), parse_rat(&t.coeff)?));
    }
    Ok(Poly::from_terms(terms, order))
}

/// Path of the record for cone `ucn` under `dir`.
pub fn cone_path(dir: &Path, ucn: ConeId) -> PathBuf {
    dir.join(format!("cone_{}.json", ucn.0))
}

/// Serialize `cone` into `dir`, returning the written path.
pub fn write_cone(dir: &Path, cone: &Cone) -> Result<PathBuf, FanError> {
    let rec = ConeRecord {
        ucn: cone.id.0,
        parent: cone.parent.map(|p| p.0),
        nvars: cone.ring.nvars,
        order_rows: cone.ring.order.rows().iter().map(|r| int_strings(r)).collect(),
        basis: cone.basis.iter().map(poly_record).collect(),
        interior_point: int_strings(&cone.interior_point),
        facets: cone
            .facets()
            .iter()
            .map(|f| FacetRecord {
                normal: int_strings(f.normal()),
                interior_point: int_strings(f.interior_point()),
                ucn: f.ucn().map(|c| c.0),
                codim: f.codim(),
                flippable: f.flippable,
                incoming: f.incoming,
                codim2: f
                    .codim2_facets()
                    .iter()
                    .map(|s| int_strings(s.normal()))
                    .collect(),
            })
            .collect(),
    };
    let path = cone_path(dir, cone.id);
    let body = serde_json::to_string_pretty(&rec)?;
    fs::write(&path, body)?;
    Ok(path)
}

/// Read the record for cone `ucn` back from `dir`.
///
/// The stored reduced basis generates the ideal, so the reconstructed
/// cone's ideal handle is rebuilt from the basis itself. Stored geometry is
/// cross-checked against the ring arity and the flippability rule; a
/// mismatch is a malformed record, not a silent repair.
pub fn read_cone(dir: &Path, ucn: ConeId) -> Result<Cone, FanError> {
    let body = fs::read_to_string(cone_path(dir, ucn))?;
    let rec: ConeRecord = serde_json::from_str(&body)?;

    let mut order_rows = Vec::with_capacity(rec.order_rows.len());
    for row in &rec.order_rows {
        order_rows.push(parse_ints(row)?);
    }
    let order = TermOrder::from_rows(order_rows);

    let mut basis = Vec::with_capacity(rec.basis.len());
    for p in &rec.basis {
        basis.push(poly_from_record(p, &order)?);
    }
    for g in &basis {
        if !g.is_zero() && g.lm().nvars() != rec.nvars {
            return Err(FanError::MalformedCone(format!(
                "record {}: generator arity {} does not match ring arity {}",
                rec.ucn,
                g.lm().nvars(),
                rec.nvars
            )));
        }
    }

    let mut facets = Vec::with_capacity(rec.facets.len());
    for f in &rec.facets {
        let normal = parse_ints(&f.normal)?;
        if normal.len() != rec.nvars {
            return Err(FanError::MalformedCone(format!(
                "record {}: facet normal has {} entries, expected {}",
                rec.ucn,
                normal.len(),
                rec.nvars
            )));
        }
        if f.flippable && !is_mixed_sign(&normal) {
            return Err(FanError::MalformedCone(format!(
                "record {}: stored flippability contradicts normal {:?}",
                rec.ucn, f.normal
            )));
        }
        if let Some(owner) = f.ucn {
            if owner != rec.ucn {
                return Err(FanError::MalformedCone(format!(
                    "record {}: facet claims owning cone {owner}",
                    rec.ucn
                )));
            }
        }
        let mut facet = Facet::from_normal(normal, f.codim);
        facet.flippable = f.flippable;
        facet.set_interior_point(parse_ints(&f.interior_point)?);
        facet.incoming = f.incoming;
        let mut subs = Vec::with_capacity(f.codim2.len());
        for row in &f.codim2 {
            let mut sub = Facet::from_normal(parse_ints(row)?, 2);
            sub.set_ucn(ConeId(rec.ucn));
            subs.push(sub);
        }
        facet.set_codim2_facets(subs);
        facets.push(facet);
    }

    let ideal = Ideal::new(rec.nvars, basis.clone());
    let seed = ConeSeed {
        ring: RingCtx {
            nvars: rec.nvars,
            order,
        },
        ideal,
        basis,
        interior_point: parse_ints(&rec.interior_point)?,
        facets,
    };
    Ok(seed.into_cone(ConeId(rec.ucn), rec.parent.map(ConeId)))
}
