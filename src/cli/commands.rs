use crate::cli::args::{Cli, Commands, ExportFormat};
use crate::config::{InputColumn, MetConfig};
use crate::error::Result;
use crate::processors::{MetProcessor, SavedSeries};
use crate::store::{ParquetStore, SeriesStore};
use crate::writers::{CsvWriter, ParquetWriter};

pub async fn run(cli: Cli) -> Result<()> {
    let config = || -> Result<MetConfig> {
        let mut config = MetConfig::load(cli.config.as_deref())?;
        if let Some(store) = &cli.store {
            config.store.path = store.clone();
        }
        Ok(config)
    };

    match cli.command {
        Commands::Run { quiet } => {
            let config = config()?;
            println!("Running all steps for {} stations", config.stations.len());
            println!("Store: {}", config.store.path.display());

            let mut store = open_store(&config)?;
            let processor = MetProcessor::new(config).with_silent(quiet);
            let saved = processor.run(&mut store).await?;

            print_saved(&saved);
            println!("Processing complete!");
        }

        Commands::Daily { step } => {
            let config = config()?;
            let mut store = open_store(&config)?;
            let saved = MetProcessor::new(config).run_daily(&mut store, step).await?;
            print_saved(&saved);
        }

        Commands::Hourly { step } => {
            let config = config()?;
            let mut store = open_store(&config)?;
            let saved = MetProcessor::new(config).run_hourly(&mut store, step).await?;
            print_saved(&saved);
        }

        Commands::Check => {
            let config = config()?;
            println!("Configuration OK");
            println!("\nStations:");
            for (i, station) in config.stations.iter().enumerate() {
                println!(
                    "  {}. {} ({}) latitude {:.4}",
                    i + 1,
                    station.display_name(),
                    station.id,
                    station.latitude
                );
            }

            println!("\nInputs:");
            let inputs = &config.inputs;
            for (label, input) in [
                ("tmax", &inputs.tmax),
                ("tmin", &inputs.tmin),
                ("wind", &inputs.wind),
                ("sunshine", &inputs.sunshine),
                ("temperature", &inputs.temperature),
                ("humidity", &inputs.humidity),
                ("solar", &inputs.solar),
                ("precipitation", &inputs.precipitation),
            ] {
                println!("  {:<14}{}", label, describe_input(input.as_ref()));
            }

            println!("\nObservation hour: {}", config.observation_hour);
            println!("Precipitation method: {}", config.precipitation_method);
            println!("Workers: {}", config.max_workers);
            println!("Store: {} ({})", config.store.path.display(), config.store.compression);
        }

        Commands::List { location } => {
            let config = config()?;
            let store = open_store(&config)?;

            println!(
                "{:>5}  {:<10} {:<6} {:<9} {:>8}  {}",
                "DSN", "Location", "Type", "Scenario", "Values", "Description"
            );
            for dsn in store.list()? {
                let attributes = store.describe(dsn)?;
                if location.as_ref().is_some_and(|l| *l != attributes.location) {
                    continue;
                }
                let values = store.read(dsn)?.len();
                println!(
                    "{:>5}  {:<10} {:<6} {:<9} {:>8}  {}",
                    dsn,
                    attributes.location,
                    attributes.tstype,
                    attributes.scenario,
                    values,
                    attributes.description
                );
            }
        }

        Commands::Export {
            dsn,
            output,
            format,
        } => {
            let config = config()?;
            let store = open_store(&config)?;
            let series = store.read(dsn)?;
            println!("Exporting DSN {} ({} values) to {}", dsn, series.len(), output.display());

            match format {
                ExportFormat::Csv => CsvWriter::new().write_series(&series, &output)?,
                ExportFormat::Parquet => {
                    let writer = ParquetWriter::new().with_compression(&config.store.compression)?;
                    if let Some(parent) = output.parent() {
                        if !parent.as_os_str().is_empty() {
                            std::fs::create_dir_all(parent)?;
                        }
                    }
                    writer.write_series(&series, &output)?;
                    println!("\n{}", writer.get_file_info(&output)?.summary());
                }
            }
        }
    }

    Ok(())
}

fn open_store(config: &MetConfig) -> Result<ParquetStore> {
    ParquetStore::open(&config.store.path)?.with_compression(&config.store.compression)
}

fn describe_input(input: Option<&InputColumn>) -> String {
    match input {
        Some(input) => format!(
            "{} column {} (scale {}, invalid {})",
            input.file.display(),
            input.column,
            input.scale,
            input.invalid_value
        ),
        None => "-".to_string(),
    }
}

fn print_saved(saved: &[SavedSeries]) {
    if saved.is_empty() {
        println!("No data sets written");
        return;
    }
    println!("\nWrote {} data sets:", saved.len());
    for entry in saved {
        println!("  {}", entry);
    }
}
