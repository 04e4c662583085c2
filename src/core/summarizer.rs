use crate::core::{DatasetOverview, DateRange, Money, Performer, SalesDataset, SalesRecord, SummaryStatistics};
use crate::utils::error::{ReportError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

const DATE_COLUMNS: &[&str] = &["date", "sale_date", "order_date"];
const REGION_COLUMNS: &[&str] = &["region"];
const PRODUCT_COLUMNS: &[&str] = &["product", "product_name"];
const SALESPERSON_COLUMNS: &[&str] = &["salesperson", "sales_person", "sales_rep"];
const UNITS_COLUMNS: &[&str] = &["units_sold", "quantity", "qty", "units"];
const PRICE_COLUMNS: &[&str] = &["unit_price", "price"];
const REVENUE_COLUMNS: &[&str] = &["revenue", "sales_amount"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const SAMPLE_EDGE_ROWS: usize = 5;

/// Header lookup tolerant of case, spaces and dashes (`Units Sold` == `units_sold`).
struct ColumnIndex {
    normalized: Vec<String>,
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord) -> Self {
        Self {
            normalized: headers
                .iter()
                .map(|h| h.trim().to_lowercase().replace([' ', '-'], "_"))
                .collect(),
        }
    }

    fn find(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.normalized.iter().position(|h| h == alias))
    }

    fn require(&self, aliases: &[&str], display: &str) -> Result<usize> {
        self.find(aliases)
            .ok_or_else(|| ReportError::data(format!("missing required column '{}'", display)))
    }
}

fn cell<'r>(row: &'r csv::StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_money(value: &str) -> Option<Money> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().and_then(Money::from_decimal)
}

/// Reads a sales CSV with a header row into records, preserving row order.
pub fn parse_sales_csv(data: &[u8]) -> Result<SalesDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ReportError::data("CSV file is empty"));
    }

    let columns = ColumnIndex::new(&headers);
    let date_col = columns.find(DATE_COLUMNS);
    let region_col = columns.find(REGION_COLUMNS);
    let product_col = columns.require(PRODUCT_COLUMNS, "Product")?;
    let salesperson_col = columns.require(SALESPERSON_COLUMNS, "Salesperson")?;
    let units_col = columns.require(UNITS_COLUMNS, "Units_Sold")?;
    let price_col = columns.find(PRICE_COLUMNS);
    let revenue_col = columns.find(REVENUE_COLUMNS);
    if price_col.is_none() && revenue_col.is_none() {
        return Err(ReportError::data(
            "missing required column 'Revenue' (or 'Unit_Price' to derive it)",
        ));
    }

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row_no = idx + 1;
        let row = row.map_err(|e| ReportError::data(format!("row {}: {}", row_no, e)))?;

        let product = cell(&row, Some(product_col))
            .ok_or_else(|| ReportError::data(format!("row {}: empty Product", row_no)))?;
        let salesperson = cell(&row, Some(salesperson_col))
            .ok_or_else(|| ReportError::data(format!("row {}: empty Salesperson", row_no)))?;

        let units_raw = cell(&row, Some(units_col)).unwrap_or("");
        let units_sold: u64 = units_raw.parse().map_err(|_| {
            ReportError::data(format!(
                "row {}: Units_Sold '{}' is not a whole number",
                row_no, units_raw
            ))
        })?;

        let unit_price = match cell(&row, price_col) {
            Some(raw) => Some(parse_money(raw).ok_or_else(|| {
                ReportError::data(format!("row {}: Unit_Price '{}' is not numeric", row_no, raw))
            })?),
            None => None,
        };

        let revenue = match (cell(&row, revenue_col), unit_price) {
            (Some(raw), _) => parse_money(raw).ok_or_else(|| {
                ReportError::data(format!("row {}: Revenue '{}' is not numeric", row_no, raw))
            })?,
            (None, Some(price)) => i64::try_from(units_sold)
                .ok()
                .and_then(|units| price.cents().checked_mul(units))
                .map(Money::from_cents)
                .ok_or_else(|| ReportError::data(format!("row {}: revenue overflows", row_no)))?,
            (None, None) => {
                return Err(ReportError::data(format!(
                    "row {}: neither Revenue nor Unit_Price is set",
                    row_no
                )))
            }
        };

        records.push(SalesRecord {
            date: cell(&row, date_col).unwrap_or("N/A").to_string(),
            region: cell(&row, region_col).map(str::to_string),
            product: product.to_string(),
            salesperson: salesperson.to_string(),
            units_sold,
            unit_price,
            revenue,
        });
    }

    tracing::debug!("Parsed {} sales records", records.len());

    Ok(SalesDataset {
        columns: headers.iter().map(|h| h.trim().to_string()).collect(),
        records,
    })
}

/// Revenue per key, highest first; equal revenue keeps first-seen order.
fn breakdown<'a, F>(records: &'a [SalesRecord], key: F) -> Result<Vec<Performer>>
where
    F: Fn(&'a SalesRecord) -> Option<&'a str>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, Money)> = Vec::new();

    for record in records {
        let Some(name) = key(record) else { continue };
        match positions.get(name) {
            Some(&pos) => {
                totals[pos].1 = totals[pos]
                    .1
                    .checked_add(record.revenue)
                    .ok_or_else(|| ReportError::data("revenue total overflows"))?;
            }
            None => {
                positions.insert(name, totals.len());
                totals.push((name, record.revenue));
            }
        }
    }

    // sort_by 為穩定排序，同額時保留先出現者
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(totals
        .into_iter()
        .map(|(name, revenue)| Performer {
            name: name.to_string(),
            revenue,
        })
        .collect())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Earliest and latest date when every row has a recognizable date,
/// otherwise the first and last row as written.
fn date_range(records: &[SalesRecord]) -> DateRange {
    let parsed: Option<Vec<(NaiveDate, &str)>> = records
        .iter()
        .map(|r| parse_date(&r.date).map(|d| (d, r.date.as_str())))
        .collect();

    match parsed.as_deref() {
        Some(dates) if !dates.is_empty() => {
            let first = dates.iter().min_by_key(|(d, _)| *d).map(|(_, s)| *s);
            let last = dates.iter().max_by_key(|(d, _)| *d).map(|(_, s)| *s);
            DateRange {
                first: first.unwrap_or("N/A").to_string(),
                last: last.unwrap_or("N/A").to_string(),
            }
        }
        _ => DateRange {
            first: records.first().map_or("N/A", |r| r.date.as_str()).to_string(),
            last: records.last().map_or("N/A", |r| r.date.as_str()).to_string(),
        },
    }
}

/// Aggregates the records into the facts the report writer narrates.
pub fn summarize(records: &[SalesRecord]) -> Result<SummaryStatistics> {
    if records.is_empty() {
        return Err(ReportError::data("no sales records to summarize"));
    }

    let mut total_revenue = Money::default();
    let mut total_units_sold: u64 = 0;
    for record in records {
        total_revenue = total_revenue
            .checked_add(record.revenue)
            .ok_or_else(|| ReportError::data("revenue total overflows"))?;
        total_units_sold = total_units_sold
            .checked_add(record.units_sold)
            .ok_or_else(|| ReportError::data("units total overflows"))?;
    }

    let average = Money::from_cents(
        (total_revenue.cents() as f64 / records.len() as f64).round() as i64,
    );

    let region_breakdown = breakdown(records, |r| r.region.as_deref())?;
    let product_breakdown = breakdown(records, |r| Some(r.product.as_str()))?;
    let salesperson_breakdown = breakdown(records, |r| Some(r.salesperson.as_str()))?;

    let top_product = product_breakdown
        .first()
        .cloned()
        .ok_or_else(|| ReportError::data("no products found"))?;
    let top_salesperson = salesperson_breakdown
        .first()
        .cloned()
        .ok_or_else(|| ReportError::data("no salespeople found"))?;

    Ok(SummaryStatistics {
        total_revenue,
        total_units_sold,
        average_revenue_per_transaction: average,
        number_of_transactions: records.len(),
        date_range: date_range(records),
        top_region: region_breakdown.first().cloned(),
        top_product,
        top_salesperson,
        region_breakdown,
        product_breakdown,
        salesperson_breakdown,
    })
}

/// Shape of the data: columns, size, a few rows from each end.
pub fn overview(dataset: &SalesDataset) -> Result<DatasetOverview> {
    let records = &dataset.records;
    if records.is_empty() {
        return Err(ReportError::data("CSV file is empty"));
    }

    let sample_data = if records.len() > SAMPLE_EDGE_ROWS * 2 {
        records[..SAMPLE_EDGE_ROWS]
            .iter()
            .chain(&records[records.len() - SAMPLE_EDGE_ROWS..])
            .cloned()
            .collect()
    } else {
        records.clone()
    };

    Ok(DatasetOverview {
        total_rows: records.len(),
        columns: dataset.columns.clone(),
        sample_data,
        date_range: DateRange {
            first: records[0].date.clone(),
            last: records[records.len() - 1].date.clone(),
        },
    })
}
