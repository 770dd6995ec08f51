use clap::Parser;
use hspf_met::cli::{run, Cli};
use hspf_met::config::MetConfig;
use hspf_met::error::ProcessingError;
use hspf_met::processors::{DailyStep, HourlyStep, MetProcessor};
use hspf_met::store::{MemoryStore, ParquetStore, SeriesStore};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const STATIONS: [(u32, f64); 2] = [(59843, 19.7333), (59848, 19.2333)];
const DAYS: u32 = 10;

fn write_input(dir: &Path, name: &str, header: &str, row: impl Fn(usize, u32) -> String) {
    let mut body = format!("f1,f5,f6,f7,{}\n", header);
    for (s, (id, _)) in STATIONS.iter().enumerate() {
        for day in 1..=DAYS {
            writeln!(body, "{},2023,7,{},{}", id, day, row(s, day)).unwrap();
        }
    }
    fs::write(dir.join(name), body).unwrap();
}

/// Ten July days for two stations, one file per element, plus a config
/// pointing at them.
fn write_dataset(dir: &Path) -> std::path::PathBuf {
    write_input(dir, "tem.csv", "f8,f9,f10", |s, day| {
        let tmax = if s == 0 && day == 5 {
            "32766".to_string()
        } else {
            (320 + day).to_string()
        };
        format!("{},{},{}", 280 + 5 * s, tmax, 240 + day)
    });
    write_input(dir, "rhu.csv", "f8", |_, _| "80".to_string());
    write_input(dir, "win.csv", "f8", |_, _| "25".to_string());
    write_input(dir, "ssd.csv", "f8", |_, _| "60".to_string());
    write_input(dir, "rad.csv", "f8", |_, _| "1800".to_string());
    write_input(dir, "pre.csv", "f8", |_, day| {
        match day {
            3 => "125",
            7 => "32700",
            _ => "0",
        }
        .to_string()
    });

    let mut toml = String::new();
    writeln!(toml, "precipitation_method = \"triangular\"").unwrap();
    writeln!(toml, "max_workers = 2").unwrap();
    for (id, latitude) in STATIONS {
        writeln!(toml, "\n[[stations]]\nid = \"{}\"\nlatitude = {}", id, latitude).unwrap();
    }
    writeln!(toml, "\n[store]\npath = {:?}", dir.join("store").display().to_string()).unwrap();

    let inputs = [
        ("tmax", "tem.csv", "f9", ""),
        ("tmin", "tem.csv", "f10", ""),
        ("temperature", "tem.csv", "f8", ""),
        ("humidity", "rhu.csv", "f8", "scale = 1.0\n"),
        ("wind", "win.csv", "f8", ""),
        ("sunshine", "ssd.csv", "f8", ""),
        ("solar", "rad.csv", "f8", "scale = 0.01\ninvalid_value = 999998\n"),
        ("precipitation", "pre.csv", "f8", ""),
    ];
    for (key, file, column, extra) in inputs {
        writeln!(
            toml,
            "\n[inputs.{}]\nfile = {:?}\ncolumn = \"{}\"\n{}",
            key,
            dir.join(file).display().to_string(),
            column,
            extra
        )
        .unwrap();
    }

    let path = dir.join("hspf-met.toml");
    fs::write(&path, toml).unwrap();
    path
}

#[tokio::test]
async fn test_full_pipeline_into_parquet_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = write_dataset(temp_dir.path());
    let config = MetConfig::load(Some(&config_path)).unwrap();

    let mut store = ParquetStore::open(&config.store.path).unwrap();
    let processor = MetProcessor::new(config.clone()).with_silent(true);
    let saved = processor.run(&mut store).await.unwrap();

    // Eight daily and eight hourly data sets per station.
    assert_eq!(saved.len(), 32);

    // Isolated missing maximum is the mean of its neighbours, 32.5 °C.
    let tmax = store.read(19).unwrap();
    assert_eq!(tmax.len(), DAYS as usize);
    assert!((tmax.values()[4] - 90.5).abs() < 1e-9);

    let dwnd = store.read(41).unwrap();
    assert!((dwnd.values()[0] - 2.5 * 2.23694 * 24.0).abs() < 1e-9);

    let devt = store.read(25).unwrap();
    assert!(devt.values().iter().all(|&v| v > 0.0));
    let devp = store.read(46).unwrap();
    assert_eq!(devp.len(), DAYS as usize);

    let atem = store.read(33).unwrap();
    assert!(!atem.is_empty());
    assert!(atem.values().iter().all(|v| v.is_finite()));

    let prec = store.read(11).unwrap();
    assert_eq!(prec.len(), 24 * DAYS as usize);
    let total: f64 = prec.values().iter().sum();
    assert!((total - 12.5 * 0.0393701).abs() < 0.01);

    let evap = store.read(32).unwrap();
    assert_eq!(evap.len(), 24 * DAYS as usize);

    // Catalogue survives a reopen.
    let reopened = ParquetStore::open(&config.store.path).unwrap();
    assert_eq!(reopened.list().unwrap().len(), 32);
    assert_eq!(reopened.describe(13).unwrap().location, "59843");
    assert_eq!(reopened.describe(33).unwrap().location, "59848");
    assert_eq!(reopened.describe(33).unwrap().tstype, "ATEM");
}

#[tokio::test]
async fn test_rerunning_a_step_replaces_data_sets() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = MetConfig::load(Some(&write_dataset(temp_dir.path()))).unwrap();

    let processor = MetProcessor::new(config).with_silent(true);
    let mut store = MemoryStore::new();
    processor.run_daily(&mut store, DailyStep::Wind).await.unwrap();
    let again = processor.run_daily(&mut store, DailyStep::Wind).await.unwrap();

    assert_eq!(again.len(), 2);
    assert_eq!(store.list().unwrap(), vec![21, 41]);

    processor.run_hourly(&mut store, HourlyStep::Wind).await.unwrap();
    let wind = store.read(14).unwrap();
    assert_eq!(wind.name(), "WIND");
    assert_eq!(wind.len(), 24 * DAYS as usize);
}

#[tokio::test]
async fn test_unknown_column_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut config = MetConfig::load(Some(&write_dataset(temp_dir.path()))).unwrap();
    if let Some(tmax) = config.inputs.tmax.as_mut() {
        tmax.column = "f99".into();
    }

    let processor = MetProcessor::new(config).with_silent(true);
    let result = processor.run_daily(&mut MemoryStore::new(), DailyStep::Tmax).await;
    assert!(matches!(result, Err(ProcessingError::ColumnNotFound(_))));
}

#[tokio::test]
async fn test_cli_daily_then_export() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = write_dataset(temp_dir.path());
    let config_arg = config_path.display().to_string();
    let output = temp_dir.path().join("export").join("dclo.csv");
    let output_arg = output.display().to_string();

    run(Cli::parse_from(["hspf-met", "-c", &config_arg, "daily", "cloud"]))
        .await
        .unwrap();
    run(Cli::parse_from(["hspf-met", "-c", &config_arg, "export", "--dsn", "22", "-o", &output_arg]))
        .await
        .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("datetime,DCLO"));
    assert_eq!(lines.count(), DAYS as usize);
    assert!(text.contains("2023-07-01 00:00:00,"));
}
