use fuel_economy_dashboard::data::model::{
    COL_CARLINE, COL_CARLINE_CLASS, COL_CITY_MPG, COL_COMBINED_MPG, COL_CYLINDERS, COL_DIVISION,
    COL_DRIVE_SYSTEM, COL_ENGINE_DISPLACEMENT, COL_HIGHWAY_MPG, COL_MANUFACTURER, COL_MODEL_YEAR,
    COL_TRANSMISSION,
};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Lineup {
    manufacturer: &'static str,
    division: &'static str,
    carline: &'static str,
    class: &'static str,
    displacement: f64,
    cylinders: u32,
}

const LINEUPS: &[Lineup] = &[
    Lineup { manufacturer: "Toyota", division: "Toyota", carline: "PRIUS", class: "Midsize Cars", displacement: 2.0, cylinders: 4 },
    Lineup { manufacturer: "Toyota", division: "Lexus", carline: "RX 350", class: "Standard SUV 4WD", displacement: 2.4, cylinders: 4 },
    Lineup { manufacturer: "Honda", division: "Honda", carline: "CIVIC", class: "Compact Cars", displacement: 1.5, cylinders: 4 },
    Lineup { manufacturer: "Honda", division: "Acura", carline: "MDX", class: "Standard SUV 4WD", displacement: 3.5, cylinders: 6 },
    Lineup { manufacturer: "Ford Motor Company", division: "Ford", carline: "F150 PICKUP 4WD", class: "Standard Pick-up Trucks 4WD", displacement: 5.0, cylinders: 8 },
    Lineup { manufacturer: "Ford Motor Company", division: "Ford", carline: "MUSTANG", class: "Subcompact Cars", displacement: 2.3, cylinders: 4 },
    Lineup { manufacturer: "Kia", division: "Kia", carline: "FORTE", class: "Midsize Cars", displacement: 2.0, cylinders: 4 },
];

const TRANSMISSIONS: &[&str] = &["Auto(S8)", "Auto(AV-S6)", "Manual(M6)", "Auto(S10)", "Semi-Auto(AM7)"];
const DRIVES: &[&str] = &["2-Wheel Drive, Front", "All Wheel Drive", "4-Wheel Drive"];

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_vehicles.csv";
    let mut writer = csv::Writer::from_path(output_path)?;

    writer.write_record([
        COL_MODEL_YEAR,
        COL_MANUFACTURER,
        COL_DIVISION,
        COL_CARLINE,
        COL_CARLINE_CLASS,
        COL_TRANSMISSION,
        COL_ENGINE_DISPLACEMENT,
        COL_CYLINDERS,
        COL_DRIVE_SYSTEM,
        COL_CITY_MPG,
        COL_HIGHWAY_MPG,
        COL_COMBINED_MPG,
    ])?;

    let mut rows = 0;
    for year in 2021..=2025 {
        for lineup in LINEUPS {
            // Larger engines burn more; each model year gains a little.
            let base = 52.0 - 7.0 * lineup.displacement + (year - 2021) as f64 * 0.6;
            let city = (base + rng.next_f64() * 4.0 - 2.0).max(9.0).round();
            let highway = (city * 1.25 + rng.next_f64() * 3.0).round();
            let combined = (0.55 * city + 0.45 * highway).round();

            // A few rows carry unusable figures, as in the real files.
            let combined_cell = if rng.next_f64() < 0.05 {
                "N/A".to_string()
            } else {
                combined.to_string()
            };

            writer.write_record([
                year.to_string(),
                lineup.manufacturer.to_string(),
                lineup.division.to_string(),
                lineup.carline.to_string(),
                lineup.class.to_string(),
                rng.pick(TRANSMISSIONS).to_string(),
                format!("{:.1}", lineup.displacement),
                lineup.cylinders.to_string(),
                rng.pick(DRIVES).to_string(),
                city.to_string(),
                highway.to_string(),
                combined_cell,
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} vehicles to {output_path}");
    Ok(())
}
