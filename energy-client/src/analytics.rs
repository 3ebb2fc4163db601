//! Aggregations over joined production facts.
//!
//! `MemoryStore` answers analytics queries with these functions; `PgStore`
//! expresses the same rules in SQL (see `db::analytics_queries`). Callers
//! pass only the production facts that fall inside the requested range.

use std::collections::{BTreeMap, HashMap};

use time::Date;
use uuid::Uuid;

use crate::{
    domain::{
        reports::{NON_RENEWABLE, RENEWABLE},
        DailyProduction, GeneratorEfficiency, RenewableSummary,
    },
    store::cmp_names,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorFact {
    pub generator_id: Uuid,
    pub type_name: String,
    pub capacity: f64,
    pub is_renewable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionFact {
    pub generator_id: Uuid,
    pub date: Date,
    pub production_mw: f64,
}

/// Round half away from zero to two decimals, like `ROUND(x::numeric, 2)`.
///
/// Postgres casts float8 to numeric through its shortest decimal form, so the
/// rounding works on that form too: `1.005` becomes `1.01`, not `1.0`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let shortest = value.abs().to_string();
    let (whole, frac) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));
    if frac.len() <= 2 {
        return value;
    }
    let Ok(mut cents) = format!("{whole}{}", &frac[..2]).parse::<f64>() else {
        return value;
    };
    if frac.as_bytes()[2] >= b'5' {
        cents += 1.0;
    }
    if cents == 0.0 {
        return 0.0;
    }
    (cents / 100.0).copysign(value)
}

pub fn daily_totals(generators: &[GeneratorFact], productions: &[ProductionFact]) -> Vec<DailyProduction> {
    let renewable: HashMap<Uuid, bool> = generators
        .iter()
        .map(|g| (g.generator_id, g.is_renewable))
        .collect();

    let mut by_date: BTreeMap<Date, (f64, f64)> = BTreeMap::new();
    for p in productions {
        let Some(&is_renewable) = renewable.get(&p.generator_id) else {
            continue;
        };
        let entry = by_date.entry(p.date).or_insert((0.0, 0.0));
        if is_renewable {
            entry.0 += p.production_mw;
        } else {
            entry.1 += p.production_mw;
        }
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, (renewable, non_renewable))| DailyProduction {
            date,
            total_production: renewable + non_renewable,
            renewable_production: renewable,
            non_renewable_production: non_renewable,
        })
        .collect()
}

pub fn generator_efficiency(
    generators: &[GeneratorFact],
    productions: &[ProductionFact],
) -> Vec<GeneratorEfficiency> {
    let mut sums: HashMap<Uuid, (f64, u32)> = HashMap::new();
    for p in productions {
        let entry = sums.entry(p.generator_id).or_insert((0.0, 0));
        entry.0 += p.production_mw;
        entry.1 += 1;
    }

    let mut rows: Vec<GeneratorEfficiency> = generators
        .iter()
        .map(|g| {
            let (total, days) = sums.get(&g.generator_id).copied().unwrap_or((0.0, 0));
            let avg = (days > 0).then(|| total / f64::from(days));
            GeneratorEfficiency {
                generator_id: g.generator_id,
                type_name: g.type_name.clone(),
                capacity: g.capacity,
                total_production: total,
                avg_daily_production: avg,
                efficiency_percentage: avg.map(|avg| round2(avg / g.capacity * 100.0)),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let by_efficiency = match (a.efficiency_percentage, b.efficiency_percentage) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        by_efficiency
            .then_with(|| cmp_names(&a.type_name, &b.type_name))
            .then_with(|| a.generator_id.cmp(&b.generator_id))
    });
    rows
}

#[derive(Default)]
struct Partition {
    capacity: f64,
    generators: i64,
    production: f64,
    records: u32,
}

pub fn renewable_summary(generators: &[GeneratorFact], productions: &[ProductionFact]) -> Vec<RenewableSummary> {
    let mut renewable = Partition::default();
    let mut non_renewable = Partition::default();

    let mut owner: HashMap<Uuid, bool> = HashMap::with_capacity(generators.len());
    for g in generators {
        owner.insert(g.generator_id, g.is_renewable);
        let part = if g.is_renewable { &mut renewable } else { &mut non_renewable };
        part.capacity += g.capacity;
        part.generators += 1;
    }

    for p in productions {
        let Some(&is_renewable) = owner.get(&p.generator_id) else {
            continue;
        };
        let part = if is_renewable { &mut renewable } else { &mut non_renewable };
        part.production += p.production_mw;
        part.records += 1;
    }

    let grand_total = renewable.production + non_renewable.production;
    let summarize = |label: &str, part: &Partition| RenewableSummary {
        energy_type: label.to_string(),
        total_capacity: part.capacity,
        generator_count: part.generators,
        total_production: part.production,
        avg_production: if part.records == 0 {
            0.0
        } else {
            part.production / f64::from(part.records)
        },
        percentage_of_total: if grand_total == 0.0 {
            0.0
        } else {
            round2(part.production / grand_total * 100.0)
        },
    };

    // Ordered by label.
    vec![
        summarize(NON_RENEWABLE, &non_renewable),
        summarize(RENEWABLE, &renewable),
    ]
}
