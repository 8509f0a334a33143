use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (bean, roaster, roast level, ideal ratio, ideal time)
const BEANS: [(&str, &str, &str, f64, f64); 4] = [
    ("Huila Pink Bourbon", "Onyx", "Light", 2.4, 30.0),
    ("Kochere", "Tim Wendelboe", "Medium Light", 2.2, 28.0),
    ("Santos", "Dark Arts", "Medium Dark", 1.9, 26.0),
    ("Sumatra Mandheling", "Square Mile", "Dark", 1.7, 25.0),
];

/// Rating falls off quadratically away from the bean's sweet spot.
fn rate(ratio: f64, time: f64, ideal_ratio: f64, ideal_time: f64, rng: &mut SimpleRng) -> f64 {
    let penalty = ((ratio - ideal_ratio) / 0.35).powi(2) + ((time - ideal_time) / 6.0).powi(2);
    (9.5 - 2.5 * penalty + rng.gauss(0.0, 0.6)).clamp(0.0, 10.0).round()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let baristas = ["Alice", "Bob", "Chidi"];
    let machines = ["Linea Micra", "Gaggia Classic"];
    let grinders = ["Niche Zero", "DF64"];

    let mut ids = Vec::new();
    let mut names = Vec::new();
    let mut bean_col = Vec::new();
    let mut roaster_col = Vec::new();
    let mut bag_col = Vec::new();
    let mut level_col = Vec::new();
    let mut barista_col = Vec::new();
    let mut machine_col = Vec::new();
    let mut grinder_col = Vec::new();
    let mut doses = Vec::new();
    let mut yields = Vec::new();
    let mut times = Vec::new();
    let mut ratings = Vec::new();
    let mut timestamps = Vec::new();

    let mut id: i64 = 0;
    for (day, &(bean, roaster, level, ideal_ratio, ideal_time)) in
        (1..).zip(BEANS.iter().cycle().take(12))
    {
        for shot in 0..6 {
            let dose = 18.0 + rng.gauss(0.0, 0.3);
            let ratio = (ideal_ratio + rng.gauss(0.0, 0.35)).max(1.2);
            let time = (ideal_time + rng.gauss(0.0, 4.0)).max(12.0);

            ids.push(id);
            names.push(format!("{bean} #{}", shot + 1));
            bean_col.push(bean.to_string());
            roaster_col.push(roaster.to_string());
            bag_col.push(format!("{bean} bag {}", (day - 1) / 4 + 1));
            level_col.push(level.to_string());
            barista_col.push(rng.pick(&baristas).to_string());
            machine_col.push(rng.pick(&machines).to_string());
            grinder_col.push(rng.pick(&grinders).to_string());
            doses.push((dose * 10.0).round() / 10.0);
            yields.push((dose * ratio * 10.0).round() / 10.0);
            times.push((time * 10.0).round() / 10.0);
            ratings.push(rate(ratio, time, ideal_ratio, ideal_time, &mut rng));
            timestamps.push(format!("2024-03-{day:02}T{:02}:00:00", 7 + shot));
            id += 1;
        }
    }

    let text = |v: &[String]| -> ArrayRef { Arc::new(StringArray::from_iter_values(v.iter())) };
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("bean", DataType::Utf8, true),
        Field::new("roaster", DataType::Utf8, true),
        Field::new("bag", DataType::Utf8, true),
        Field::new("roast_level", DataType::Utf8, true),
        Field::new("barista", DataType::Utf8, true),
        Field::new("machine", DataType::Utf8, true),
        Field::new("grinder", DataType::Utf8, true),
        Field::new("dose", DataType::Float64, true),
        Field::new("yield", DataType::Float64, true),
        Field::new("brew_time", DataType::Float64, true),
        Field::new("rating", DataType::Float64, true),
        Field::new("timestamp", DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(ids)),
        text(&names),
        text(&bean_col),
        text(&roaster_col),
        text(&bag_col),
        text(&level_col),
        text(&barista_col),
        text(&machine_col),
        text(&grinder_col),
        Arc::new(Float64Array::from(doses)),
        Arc::new(Float64Array::from(yields)),
        Arc::new(Float64Array::from(times)),
        Arc::new(Float64Array::from(ratings)),
        text(&timestamps),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let output_path = "sample_brews.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {id} brews to {output_path}");
    Ok(())
}
