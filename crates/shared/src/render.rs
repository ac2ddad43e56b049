//! Output rendering for fetched quota data.
//!
//! Every fetched result can be rendered either as JSON (the response body as-is)
//! or as rows. Rows back both the CSV and the aligned table output, so the two
//! always carry the same values.

use chrono::{DateTime, SecondsFormat};
use comfy_table::{presets::NOTHING, Table};
use serde_json::Value;
use std::io::Write;

use crate::entity::{Entity, OutputOptions};
use crate::error::{EntityKind, QuotaError, QuotaResult};
use crate::unit::Unit;

pub trait Renderer {
    fn render_json(&self) -> QuotaResult<Vec<u8>>;
    fn render_rows(&self) -> QuotaResult<CsvData>;
}

/// A header row plus data rows, all as display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvData {
    pub fn write_csv<W: Write>(&self, w: W) -> QuotaResult<()> {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_table<W: Write>(&self, mut w: W) -> QuotaResult<()> {
        let mut table = Table::new();
        table.load_preset(NOTHING).set_header(&self.header);
        for row in &self.rows {
            table.add_row(row);
        }
        writeln!(w, "{table}")?;
        Ok(())
    }
}

/// The raw result of a get or list call, together with what was asked for.
#[derive(Debug, Clone)]
pub struct Report {
    pub entity: Entity,
    pub output: OutputOptions,
    pub body: Value,
}

impl Renderer for Report {
    fn render_json(&self) -> QuotaResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.body)?)
    }

    fn render_rows(&self) -> QuotaResult<CsvData> {
        let kind = self.entity.kind();
        let layout = Layout::for_kind(kind, self.output);
        let mut data = CsvData {
            header: layout.header(),
            rows: Vec::new(),
        };

        for item in items(&self.body, kind)? {
            let leading = self.leading_cells(item);
            for service in array(item, "services") {
                let area = cell(service.get("area"));
                let service_type = cell(service.get("type"));
                for resource in array(service, "resources") {
                    let mut row = leading.clone();
                    row.push(area.clone());
                    row.push(service_type.clone());
                    row.push(cell(resource.get("category")));
                    row.push(cell(resource.get("name")));
                    layout.push_values(&mut row, service, resource);
                    data.rows.push(row);
                }
            }
        }

        Ok(data)
    }
}

impl Report {
    /// The identifying cells (ids or names) that start every row of `item`.
    fn leading_cells(&self, item: &Value) -> Vec<String> {
        let names = self.output.names;
        let pick = |v: &Value| {
            if names {
                cell(v.get("name"))
            } else {
                cell(v.get("id"))
            }
        };
        match &self.entity {
            Entity::Cluster(_) => vec![cell(item.get("id"))],
            Entity::Domain(_) => vec![pick(item)],
            Entity::Project(p) => {
                let domain = if names { &p.domain_name } else { &p.domain_id };
                vec![domain.clone(), pick(item)]
            }
        }
    }
}

/// The entity objects of a single (`{"domain": {...}}`) or list (`{"domains": [...]}`) body.
fn items(body: &Value, kind: EntityKind) -> QuotaResult<Vec<&Value>> {
    let singular = kind.to_string();
    let plural = format!("{singular}s");
    if let Some(list) = body.get(&plural).and_then(Value::as_array) {
        return Ok(list.iter().collect());
    }
    if let Some(one) = body.get(&singular).filter(|v| v.is_object()) {
        return Ok(vec![one]);
    }
    Err(QuotaError::Serialization(format!(
        "response has neither {singular:?} nor {plural:?}"
    )))
}

fn array<'a>(v: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    v.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn cell(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn timestamp(v: Option<&Value>) -> String {
    match v.and_then(Value::as_i64).and_then(|secs| DateTime::from_timestamp(secs, 0)) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => cell(v),
    }
}

#[derive(Clone, Copy)]
enum Column {
    /// A numeric resource field subject to unit conversion.
    Amount(&'static str),
    /// A resource field shown verbatim.
    Plain(&'static str),
    /// A service-level UNIX timestamp.
    ServiceTime(&'static str),
    UnitName,
}

struct Layout {
    leading: Vec<&'static str>,
    columns: Vec<(&'static str, Column)>,
    human_readable: bool,
}

impl Layout {
    fn for_kind(kind: EntityKind, output: OutputOptions) -> Self {
        let (domain_col, project_col) = if output.names {
            ("domain name", "project name")
        } else {
            ("domain id", "project id")
        };

        #[allow(clippy::type_complexity)]
        let (leading, mut columns, long): (
            Vec<&'static str>,
            Vec<(&'static str, Column)>,
            Vec<(&'static str, Column)>,
        ) =
            match kind {
                EntityKind::Cluster => (
                    vec!["cluster id"],
                    vec![
                        ("capacity", Column::Amount("capacity")),
                        ("domains quota", Column::Amount("domains_quota")),
                        ("usage", Column::Amount("usage")),
                    ],
                    vec![
                        ("burst usage", Column::Amount("burst_usage")),
                        ("raw capacity", Column::Amount("raw_capacity")),
                        ("comment", Column::Plain("comment")),
                        ("min scraped at", Column::ServiceTime("min_scraped_at")),
                        ("max scraped at", Column::ServiceTime("max_scraped_at")),
                    ],
                ),
                EntityKind::Domain => (
                    vec![domain_col],
                    vec![
                        ("quota", Column::Amount("quota")),
                        ("projects quota", Column::Amount("projects_quota")),
                        ("usage", Column::Amount("usage")),
                    ],
                    vec![
                        ("burst usage", Column::Amount("burst_usage")),
                        ("backend quota", Column::Amount("backend_quota")),
                        ("infinite backend quota", Column::Plain("infinite_backend_quota")),
                        ("min scraped at", Column::ServiceTime("min_scraped_at")),
                        ("max scraped at", Column::ServiceTime("max_scraped_at")),
                    ],
                ),
                EntityKind::Project => (
                    vec![domain_col, project_col],
                    vec![("quota", Column::Amount("quota")), ("usage", Column::Amount("usage"))],
                    vec![
                        ("burst usage", Column::Amount("burst_usage")),
                        ("usable quota", Column::Amount("usable_quota")),
                        ("backend quota", Column::Amount("backend_quota")),
                        ("physical usage", Column::Amount("physical_usage")),
                        ("scraped at", Column::ServiceTime("scraped_at")),
                    ],
                ),
            };

        columns.push(("unit", Column::UnitName));
        if output.long {
            columns.extend(long);
        }

        Self {
            leading,
            columns,
            human_readable: output.human_readable,
        }
    }

    fn header(&self) -> Vec<String> {
        self.leading
            .iter()
            .chain(["area", "service", "category", "resource"].iter())
            .chain(self.columns.iter().map(|(name, _)| name))
            .map(|s| s.to_string())
            .collect()
    }

    /// The unit in which this row's values are shown, and whether they get converted.
    ///
    /// All amounts of a row share the unit that fits the largest of them, so smaller
    /// amounts may show as fractions or as `<0.01`.
    fn row_unit(&self, resource: &Value) -> (Unit, Option<Unit>) {
        let raw = resource.get("unit").and_then(Value::as_str).unwrap_or("");
        let Ok(unit) = raw.parse::<Unit>() else {
            return (Unit::None, None);
        };
        if !self.human_readable {
            return (unit, None);
        }

        let largest = self
            .columns
            .iter()
            .filter_map(|(_, col)| match col {
                Column::Amount(key) => resource.get(*key).and_then(Value::as_u64),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        (unit, Some(unit.best_fit(largest)))
    }

    fn push_values(&self, row: &mut Vec<String>, service: &Value, resource: &Value) {
        let (unit, target) = self.row_unit(resource);
        for (_, col) in &self.columns {
            let text = match *col {
                Column::Amount(key) => {
                    let v = resource.get(key);
                    match (target, v.and_then(Value::as_u64)) {
                        (Some(target), Some(n)) => unit.format_in(n, target),
                        _ => cell(v),
                    }
                }
                Column::Plain(key) => cell(resource.get(key)),
                Column::ServiceTime(key) => timestamp(service.get(key)),
                Column::UnitName => match target {
                    Some(target) => target.to_string(),
                    None => cell(resource.get("unit")),
                },
            };
            row.push(text);
        }
    }
}
