use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use kpi_dashboard::data::model::{
    Record, COL_CATEGORY, COL_ORDER_ID, COL_ORDER_MONTH, COL_ORDER_YEAR, COL_PROFIT, COL_REGION,
    COL_SALES, COL_SHIP_MODE,
};

/// SplitMix64: one `u64` of state, enough for reproducible sample rows.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Pick by relative weight.
    fn pick_weighted<'a>(&mut self, items: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = items.iter().map(|(_, w)| w).sum();
        let mut r = self.unit() * total;
        for &(item, w) in items {
            if r < w {
                return item;
            }
            r -= w;
        }
        items[items.len() - 1].0
    }
}

fn generate(rng: &mut SampleRng, n_orders: usize) -> Vec<Record> {
    let regions = ["Central", "East", "South", "West"];
    let categories = ["Furniture", "Office Supplies", "Technology"];
    let ship_modes = [
        ("Standard Class", 0.6),
        ("Second Class", 0.2),
        ("First Class", 0.15),
        ("Same Day", 0.05),
    ];

    let mut records = Vec::new();
    for order in 0..n_orders {
        let year = 2014 + (rng.next_u64() % 4) as i32;
        let month = 1 + (rng.next_u64() % 12) as u32;
        let region = rng.pick(&regions);
        let ship_mode = rng.pick_weighted(&ship_modes);
        let order_id = format!("US-{year}-{:06}", 100_000 + order);

        // An order carries 1–4 line items.
        let items = 1 + rng.next_u64() % 4;
        for _ in 0..items {
            let category = rng.pick(&categories);
            let sales = (rng.range(1.0, 6.5).exp() * 100.0).round() / 100.0;
            let margin = rng.range(-0.3, 0.4);
            records.push(Record {
                region: region.to_string(),
                category: category.to_string(),
                ship_mode: ship_mode.to_string(),
                sales,
                profit: (sales * margin * 100.0).round() / 100.0,
                order_id: order_id.clone(),
                order_year: year,
                order_month: month,
            });
        }
    }
    records
}

fn write_csv(path: &str, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, records: &[Record]) -> Result<()> {
    let strings = |f: fn(&Record) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_ORDER_ID, DataType::Utf8, false),
        Field::new(COL_REGION, DataType::Utf8, false),
        Field::new(COL_CATEGORY, DataType::Utf8, false),
        Field::new(COL_SHIP_MODE, DataType::Utf8, false),
        Field::new(COL_SALES, DataType::Float64, false),
        Field::new(COL_PROFIT, DataType::Float64, false),
        Field::new(COL_ORDER_YEAR, DataType::Int64, false),
        Field::new(COL_ORDER_MONTH, DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings(|r| r.order_id.as_str()),
            strings(|r| r.region.as_str()),
            strings(|r| r.category.as_str()),
            strings(|r| r.ship_mode.as_str()),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.sales))),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.profit))),
            Arc::new(Int64Array::from_iter_values(
                records.iter().map(|r| r.order_year as i64),
            )),
            Arc::new(Int64Array::from_iter_values(
                records.iter().map(|r| r.order_month as i64),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let records = generate(&mut rng, 2_000);

    write_csv("kpi.csv", &records)?;
    write_parquet("kpi.parquet", &records)?;

    println!(
        "Wrote {} line items ({} orders) to kpi.csv and kpi.parquet",
        records.len(),
        2_000
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = generate(&mut SampleRng(7), 50);
        let b = generate(&mut SampleRng(7), 50);
        assert_eq!(a, b);
        assert!(a.len() >= 50);
    }

    #[test]
    fn rows_stay_in_schema_ranges() {
        for rec in generate(&mut SampleRng(1), 200) {
            assert!(rec.sales >= 0.0);
            assert!((1..=12).contains(&rec.order_month));
            assert!((2014..=2017).contains(&rec.order_year));
        }
    }
}
