//! Benchmark for serialize/unserialize using city data.
//!
//! Converts a JSON list of cities into `City` objects with the builder API,
//! then times encoding and decoding. Without a path argument a synthetic
//! dataset is generated.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Instant;

use phpobject::{ArrayBuilder, DecodeOptions, Object, ObjectBuilder, Value};
use serde::Deserialize;

const SYNTHETIC_CITIES: u32 = 50_000;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct City {
    id: u32,
    name: String,
    state_id: u32,
    state_code: String,
    state_name: String,
    country_id: u32,
    country_code: String,
    country_name: String,
    latitude: String,
    longitude: String,
    native: Option<String>,
    #[serde(rename = "type")]
    city_type: Option<String>,
    population: Option<i64>,
    timezone: Option<String>,
    translations: Option<HashMap<String, String>>,
    #[serde(rename = "wikiDataId")]
    wikidata_id: Option<String>,
}

fn synthetic_cities(count: u32) -> Vec<City> {
    const LANGS: [&str; 5] = ["de", "fr", "es", "ja", "pt-BR"];
    (0..count)
        .map(|i| {
            let translations = LANGS
                .iter()
                .take((i % 6) as usize)
                .map(|lang| (lang.to_string(), format!("City {i} ({lang})")))
                .collect::<HashMap<_, _>>();
            City {
                id: i,
                name: format!("City {i}"),
                state_id: i / 40,
                state_code: format!("S{}", i / 40),
                state_name: format!("State {}", i / 40),
                country_id: i / 4000,
                country_code: format!("C{}", i / 4000),
                country_name: format!("Country {}", i / 4000),
                latitude: format!("{:.5}", (i % 180) as f64 - 90.0 + 0.12345),
                longitude: format!("{:.5}", (i % 360) as f64 - 180.0 + 0.54321),
                native: (i % 3 == 0).then(|| format!("Stadt {i}")),
                city_type: (i % 5 == 0).then(|| "city".to_string()),
                population: (i % 2 == 0).then_some(i as i64 * 137),
                timezone: Some("Europe/Berlin".to_string()),
                translations: (!translations.is_empty()).then_some(translations),
                wikidata_id: (i % 7 == 0).then(|| format!("Q{}", 1000 + i)),
            }
        })
        .collect()
}

// =============================================================================
// CONVERSION USING BUILDER API
// =============================================================================

/// Builds a `City` object. `id` is declared private by the `Place` base class.
fn build_city(city: &City) -> Result<Object, phpobject::ObjectError> {
    let mut builder = ObjectBuilder::new("City")
        .inherited("Place", "id", city.id)
        .public("name", city.name.as_str())
        .public("state", region(city.state_id, &city.state_code, &city.state_name))
        .public("country", region(city.country_id, &city.country_code, &city.country_name));

    if let Some(native) = city.native.as_deref().filter(|n| !n.is_empty()) {
        builder = builder.public("native", native);
    }
    builder = builder.protected("type", city.city_type.as_deref());
    builder = builder.protected("population", city.population);

    if let (Ok(lat), Ok(lon)) = (city.latitude.parse::<f64>(), city.longitude.parse::<f64>()) {
        builder = builder.protected("location", ArrayBuilder::new().entry("lat", lat).entry("lon", lon));
    }

    builder = builder.protected("timezone", city.timezone.as_deref());
    builder = builder.private("wikidata", city.wikidata_id.as_deref());

    if let Some(translations) = &city.translations {
        // sorted for deterministic output
        let sorted: BTreeMap<&String, &String> = translations.iter().collect();
        let mut names = ArrayBuilder::new();
        for (lang, name) in sorted {
            names = names.entry(lang, name.as_str());
        }
        builder = builder.public("translations", names);
    }

    builder.build()
}

fn region(id: u32, code: &str, name: &str) -> ArrayBuilder {
    ArrayBuilder::new().entry("id", id).entry("code", code).entry("name", name)
}

fn convert_cities(cities: &[City]) -> Result<Value, phpobject::ObjectError> {
    let mut list = ArrayBuilder::new();
    for city in cities {
        list = list.push(build_city(city)?);
    }
    Ok(list.into())
}

fn throughput(bytes: usize, secs: f64) -> f64 {
    (bytes as f64 / 1_000_000.0) / secs
}

fn main() {
    let data_path = std::env::args().nth(1);

    let (cities, json_len) = match &data_path {
        Some(path) => {
            println!("Loading data from {path}...");
            let load_start = Instant::now();
            let json_data = fs::read_to_string(path).expect("Failed to read file");
            let cities: Vec<City> = serde_json::from_str(&json_data).expect("Failed to parse JSON");
            println!("Loaded {} cities in {:?}", cities.len(), load_start.elapsed());
            (cities, Some(json_data.len()))
        }
        None => {
            println!("No input file, generating {SYNTHETIC_CITIES} synthetic cities");
            (synthetic_cities(SYNTHETIC_CITIES), None)
        }
    };

    // Convert to values
    let convert_start = Instant::now();
    let value = convert_cities(&cities).expect("Failed to build city objects");
    println!("Converted to values in {:?}", convert_start.elapsed());

    // Benchmark encoding
    const ENCODE_ITERS: u32 = 10;
    let encode_start = Instant::now();
    let mut encoded = Vec::new();
    for _ in 0..ENCODE_ITERS {
        encoded = phpobject::serialize(&value);
    }
    let encode_time = encode_start.elapsed() / ENCODE_ITERS;
    println!(
        "\nSerialize: {} bytes in {:?} (avg of {} iterations)",
        encoded.len(),
        encode_time,
        ENCODE_ITERS
    );
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), encode_time.as_secs_f64()));

    // Benchmark decoding
    const DECODE_ITERS: u32 = 10;
    // Warmup
    for _ in 0..3 {
        let _ = phpobject::unserialize(&encoded).expect("Failed to decode");
    }

    let decode_start = Instant::now();
    let mut decoded = Value::Nil;
    for _ in 0..DECODE_ITERS {
        decoded = phpobject::unserialize(&encoded).expect("Failed to decode");
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;
    println!(
        "\nUnserialize: {:?} (avg of {} iterations)",
        decode_time, DECODE_ITERS
    );
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), decode_time.as_secs_f64()));
    assert_eq!(decoded, value, "Round trip should preserve the value");

    // Benchmark stream decoding
    let stream_start = Instant::now();
    let streamed = phpobject::unserialize_from_with_options(
        std::io::BufReader::new(encoded.as_slice()),
        &DecodeOptions::default(),
    )
    .expect("Failed to decode stream");
    let stream_time = stream_start.elapsed();
    println!("\nUnserialize (buffered stream): {:?}", stream_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), stream_time.as_secs_f64()));
    assert_eq!(streamed, value, "Stream decoding should match slice decoding");

    // Write output file
    if let Some(path) = &data_path {
        let input_path = Path::new(path);
        let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
        let parent = input_path.parent().unwrap_or(Path::new("."));
        let output = parent.join(format!("{stem}.ser"));
        fs::write(&output, &encoded).expect("Failed to write .ser file");
        println!("\n=== Output File ===");
        println!("Serialized: {}", output.display());
    }

    // Summary
    println!("\n=== Summary ===");
    println!("Cities: {}", cities.len());
    if let Some(json_len) = json_len {
        println!(
            "JSON size: {} bytes ({:.1} MB)",
            json_len,
            json_len as f64 / 1_000_000.0
        );
    }
    println!(
        "Serialized size: {} bytes ({:.1} MB)",
        encoded.len(),
        encoded.len() as f64 / 1_000_000.0
    );
}
